/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	borrow::Borrow,
	fmt::{self, Debug, Display},
	hash::{BuildHasher, Hash, RandomState},
	ops::RangeBounds,
	sync::Arc,
};

use log::debug;
use parking_lot::Mutex;

use crate::{
	config::CacheConfig,
	entry::CacheEntry,
	error::CacheError,
	limit::CacheLimit,
	stack::LfuStack,
	stats::{AtomicStats, Stats},
};

/// A thread-safe least-frequently-used cache.
///
/// Every entry carries an access count which starts at one and grows by one
/// on every read. Entries are kept ordered by that count so that, when the
/// cache is full, the least frequently used entry is the one evicted.
///
/// All operations, including reads, are serialized by a single lock since
/// reads reorder entries.
///
/// # Examples
///
/// ```
/// use lfu_cache::LfuCache;
///
/// let cache = LfuCache::<&str, u32>::new(2).unwrap();
///
/// assert!(cache.add("a", 1));
/// assert!(cache.add("b", 2));
/// assert_eq!(cache.get("b").as_deref(), Some(&2));
///
/// // "a" is now the least frequently used entry and makes room for "c"
/// assert!(cache.add("c", 3));
/// assert!(!cache.has("a"));
/// ```
pub struct LfuCache<K, V, S = RandomState> {
	state: Mutex<CacheState<K, V, S>>,
	stats: AtomicStats,
}

/// The lock-protected part of the cache. Holding a `&mut CacheState` means
/// holding the lock, so internal operations compose without re-locking.
struct CacheState<K, V, S> {
	stack: LfuStack<K, V, S>,
	limit: CacheLimit,
}

impl<K, V> LfuCache<K, V, RandomState>
where
	K: Eq + Hash + Clone,
{
	/// Creates an empty cache holding at most `limit` entries.
	///
	/// The limit may be anything convertible into a [`CacheLimit`]: a
	/// `usize`, an `Option<usize>` where `None` means unbounded, a signed
	/// integer or a string. Invalid limits return a [`CacheError`].
	///
	/// # Examples
	///
	/// ```
	/// use lfu_cache::{CacheError, CacheLimit, LfuCache};
	///
	/// assert!(LfuCache::<u32, u32>::new(16).is_ok());
	/// assert!(LfuCache::<u32, u32>::new(CacheLimit::Unbounded).is_ok());
	///
	/// assert_eq!(
	///     LfuCache::<u32, u32>::new(-1i64).err(),
	///     Some(CacheError::NegativeLimit(-1)),
	/// );
	/// ```
	pub fn new<L>(limit: L) -> Result<Self, CacheError>
	where
		L: TryInto<CacheLimit>,
		CacheError: From<L::Error>,
	{
		LfuCache::with_hasher(limit, RandomState::new())
	}

	#[must_use]
	pub fn with_config(config: CacheConfig) -> Self {
		LfuCache::from_parts(config.limit, RandomState::new())
	}
}

impl<K, V, S> LfuCache<K, V, S>
where
	K: Eq + Hash + Clone,
	S: BuildHasher,
{
	/// Creates an empty cache holding at most `limit` entries which uses
	/// `hasher` to hash keys.
	pub fn with_hasher<L>(limit: L, hasher: S) -> Result<Self, CacheError>
	where
		L: TryInto<CacheLimit>,
		CacheError: From<L::Error>,
	{
		let limit = limit.try_into()?;
		Ok(LfuCache::from_parts(limit, hasher))
	}

	fn from_parts(limit: CacheLimit, hasher: S) -> Self {
		LfuCache {
			state: Mutex::new(CacheState {
				stack: LfuStack::with_hasher(hasher),
				limit,
			}),

			stats: AtomicStats::default(),
		}
	}

	/// Adds a new entry. Returns `false`, leaving the cache untouched, if
	/// the key is already present or the cache is blocked by a limit of
	/// zero. If the cache is full, the lowest-priority entry is evicted
	/// first.
	pub fn add(&self, key: K, value: V) -> bool {
		self.add_shared(key, Arc::new(value))
	}

	/// Like [`LfuCache::add`], but an existing entry has its value replaced.
	/// The replacement counts as an access to the entry and as a miss.
	pub fn add_or_update(&self, key: K, value: V) -> bool {
		let mut state = self.state.lock();
		state.add(&self.stats, key, Arc::new(value), true)
	}

	pub(crate) fn add_shared(&self, key: K, value: Arc<V>) -> bool {
		let mut state = self.state.lock();
		state.add(&self.stats, key, value, false)
	}

	/// Returns `true` if the key is in the cache. Does not count as an
	/// access.
	pub fn has<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.state.lock().stack.contains(key)
	}

	/// Returns the value associated with the key, counting one access to
	/// the entry, or `None` if the key is absent.
	pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		let mut state = self.state.lock();
		let value = state.stack.access(key)?;

		self.stats.hit();

		Some(value)
	}

	/// Like [`LfuCache::get`], but returns `default` if the key is absent.
	pub fn get_or<Q>(&self, key: &Q, default: V) -> Arc<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.get(key).unwrap_or_else(|| Arc::new(default))
	}

	/// Removes the entry associated with the key. Returns `false` if the
	/// key is absent.
	pub fn remove<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.state.lock().stack.remove(key)
	}

	/// Removes every entry. The hit and miss counters are kept.
	pub fn clear(&self) {
		let mut state = self.state.lock();
		let len = state.stack.len();

		state.stack.clear();

		debug!("cleared {len} entries");
	}

	pub fn len(&self) -> usize {
		self.state.lock().stack.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn limit(&self) -> CacheLimit {
		self.state.lock().limit
	}

	/// Sets the cache's limit. If the cache holds more entries than the new
	/// limit allows, the lowest-priority entries are dropped. An invalid
	/// limit returns a [`CacheError`] and leaves the cache unchanged.
	///
	/// # Examples
	///
	/// ```
	/// use lfu_cache::{CacheLimit, LfuCache};
	///
	/// let cache = LfuCache::<u32, u32>::new(4).unwrap();
	///
	/// for key in 0..4 {
	///     cache.add(key, key);
	/// }
	///
	/// cache.set_limit(2).unwrap();
	/// assert_eq!(cache.len(), 2);
	///
	/// assert!(cache.set_limit("whoops").is_err());
	/// assert_eq!(cache.limit(), CacheLimit::Bounded(2));
	/// ```
	pub fn set_limit<L>(&self, limit: L) -> Result<(), CacheError>
	where
		L: TryInto<CacheLimit>,
		CacheError: From<L::Error>,
	{
		let limit = limit.try_into()?;

		let mut state = self.state.lock();
		state.resize(limit);

		Ok(())
	}

	/// Returns the number of reads served from the cache.
	pub fn hits(&self) -> u64 {
		self.stats.hits()
	}

	/// Returns the number of values written into the cache.
	pub fn misses(&self) -> u64 {
		self.stats.misses()
	}

	pub fn stats(&self) -> Stats {
		let state = self.state.lock();
		self.stats.to_stats(state.limit, state.stack.len())
	}

	/// Returns snapshots of the entries in `range`, highest priority first.
	/// Intended for diagnostics: the relative order of entries with equal
	/// access counts is not part of the cache's contract.
	pub fn retrieve<R>(&self, range: R) -> Vec<CacheEntry<K, V>>
	where
		R: RangeBounds<usize>,
	{
		self.state.lock().stack.retrieve(range)
	}
}

impl<K, V, S> CacheState<K, V, S>
where
	K: Eq + Hash + Clone,
	S: BuildHasher,
{
	fn add(&mut self, stats: &AtomicStats, key: K, value: Arc<V>, update: bool) -> bool {
		if self.limit.is_blocked() {
			return false;
		}

		if self.stack.contains(&key) {
			if !update || !self.stack.update(&key, value) {
				return false;
			}

			stats.miss();
			return true;
		}

		match self.limit.get() {
			Some(limit) if self.stack.len() >= limit => {
				if self.stack.evict(limit).is_some() {
					debug!("evicted the least frequently used entry at limit {limit}");
				}
			},

			_ => {},
		}

		self.stack.insert(key, value);
		stats.miss();

		true
	}

	fn resize(&mut self, limit: CacheLimit) {
		if let Some(bound) = limit.get() {
			let dropped = self.stack.truncate(bound);

			if dropped > 0 {
				debug!("dropped {dropped} entries to fit limit {limit}");
			}
		}

		self.limit = limit;
	}
}

impl<K, V> Default for LfuCache<K, V, RandomState>
where
	K: Eq + Hash + Clone,
{
	fn default() -> Self {
		LfuCache::with_config(CacheConfig::default())
	}
}

impl<K, V, S> Display for LfuCache<K, V, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		write!(f, "<LfuCache ({}/{} entries)>", state.stack.len(), state.limit)
	}
}

impl<K, V, S> Debug for LfuCache<K, V, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();

		f.debug_struct("LfuCache")
			.field("len", &state.stack.len())
			.field("limit", &state.limit)
			.field("hits", &self.stats.hits())
			.field("misses", &self.stats.misses())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use rayon::prelude::*;
	use crate::{CacheError, CacheLimit, LfuCache};

	fn generate_cache(limit: usize) -> LfuCache<String, String> {
		let cache = LfuCache::new(limit).unwrap();

		for i in 0..limit {
			cache.add(i.to_string(), format!("value-{i}"));
		}

		cache
	}

	fn fill_cache(cache: &LfuCache<String, String>, size: usize) {
		let mut filled = 0;
		let mut next = cache.len();

		while filled < size {
			if cache.add(next.to_string(), format!("value-{next}")) {
				filled += 1;
			}

			next += 1;
		}
	}

	fn keys(cache: &LfuCache<String, String>) -> Vec<String> {
		cache.retrieve(..)
			.into_iter()
			.map(|entry| entry.key)
			.collect()
	}

	fn assert_invariants(cache: &LfuCache<String, String>) {
		let state = cache.state.lock();
		state.stack.assert_invariants();

		if let Some(limit) = state.limit.get() {
			assert!(state.stack.len() <= limit);
		}
	}

	#[test]
	fn limit_is_respected() {
		let cache = generate_cache(5);
		let entries = cache.retrieve(..);

		assert_eq!(entries.len(), 5);
		assert!(cache.add("over_limit_key".to_owned(), "value".to_owned()));

		let new_entries = cache.retrieve(..);

		assert_eq!(new_entries.len(), 5);
		assert_eq!(new_entries[4].key, "over_limit_key");
		assert_eq!(new_entries[0].key, entries[0].key);
		assert_eq!(new_entries[3].key, entries[3].key);

		fill_cache(&cache, 10);

		assert_eq!(cache.len(), 5);
		assert!(!keys(&cache).contains(&"over_limit_key".to_owned()));
		assert_invariants(&cache);
	}

	#[test]
	fn limit_can_be_changed() {
		let cache = generate_cache(5);

		cache.set_limit(0).unwrap();
		assert_eq!(cache.len(), 0);
		assert!(!cache.add("blocked".to_owned(), "value".to_owned()));
		assert_eq!(cache.len(), 0);

		assert_eq!(cache.set_limit(-1i64), Err(CacheError::NegativeLimit(-1)));
		assert_eq!(
			cache.set_limit("whoops"),
			Err(CacheError::InvalidLimit("whoops".to_owned())),
		);
		assert_eq!(cache.limit(), CacheLimit::Bounded(0));

		cache.set_limit(CacheLimit::Unbounded).unwrap();
		fill_cache(&cache, 25);

		assert_eq!(cache.len(), 25);
		assert_eq!(cache.limit(), CacheLimit::Unbounded);
		assert_invariants(&cache);
	}

	#[test]
	fn invalid_limit_leaves_cache_unchanged() {
		let cache = generate_cache(5);
		let before = keys(&cache);

		assert!(cache.set_limit("-3").is_err());
		assert!(cache.set_limit("1.5").is_err());

		assert_eq!(keys(&cache), before);
		assert_eq!(cache.limit(), CacheLimit::Bounded(5));
		assert!(LfuCache::<u32, u32>::new("nope").is_err());
	}

	#[test]
	fn shrinking_limit_drops_lowest_priority_entries() {
		let cache = generate_cache(5);

		cache.get("3");
		cache.get("3");
		cache.get("1");
		cache.set_limit(2).unwrap();

		assert_eq!(keys(&cache), vec!["3", "1"]);
		assert!(!cache.has("0"));
		assert_invariants(&cache);
	}

	#[test]
	fn add_does_not_replace_existing_keys() {
		let cache = generate_cache(5);

		for i in 0..5 {
			let added = cache.add("check_key".to_owned(), format!("value-{i}"));
			assert_eq!(added, i == 0);
		}

		let entries = cache.retrieve(..);
		let key_count = entries.iter().filter(|entry| entry.key == "check_key").count();

		assert_eq!(key_count, 1);
		assert_eq!(entries[4].key, "check_key");
		assert_eq!(*entries[4].value, "value-0");
		assert_eq!(entries[4].access_count, 1);
	}

	#[test]
	fn update_counts_as_access_and_miss() {
		let cache = generate_cache(5);
		let misses = cache.misses();

		assert!(cache.add_or_update("4".to_owned(), "updated".to_owned()));

		let entries = cache.retrieve(..);

		assert_eq!(entries[0].key, "4");
		assert_eq!(*entries[0].value, "updated");
		assert_eq!(entries[0].access_count, 2);
		assert_eq!(cache.misses(), misses + 1);
		assert_eq!(cache.hits(), 0);

		assert!(cache.add_or_update("new".to_owned(), "value".to_owned()));
		assert_eq!(cache.misses(), misses + 2);
		assert_eq!(cache.len(), 5);
	}

	#[test]
	fn get_promotes_entry() {
		let cache = generate_cache(5);
		let value = format!("value-{}", 4);

		assert_eq!(cache.get("4").as_deref(), Some(&value));

		let entries = cache.retrieve(..);

		assert_eq!(entries[0].key, "4");
		assert_eq!(entries[0].access_count, 2);
		assert_eq!(&keys(&cache)[1..], &["0", "1", "2", "3"]);
	}

	#[test]
	fn get_counts_hits_and_misses() {
		let cache = generate_cache(5);
		cache.add("check_key".to_owned(), "check_value".to_owned());

		for _ in 0..5 {
			assert_eq!(cache.get("check_key").as_deref().map(String::as_str), Some("check_value"));
		}

		assert_eq!(cache.misses(), 6);
		assert_eq!(cache.hits(), 5);

		let entries = cache.retrieve(..);

		assert_eq!(entries[0].key, "check_key");
		assert_eq!(entries[0].access_count, 6);
	}

	#[test]
	fn absent_get_has_no_side_effects() {
		let cache = generate_cache(3);
		let stats = cache.stats();

		assert!(cache.get("missing").is_none());
		assert_eq!(*cache.get_or("missing", "default".to_owned()), "default");

		assert_eq!(cache.stats(), stats);
		assert_eq!(cache.len(), 3);
	}

	#[test]
	fn remove_reindexes_remaining_entries() {
		let cache = generate_cache(5);

		cache.add("check_key".to_owned(), "check_value".to_owned());
		cache.get("check_key");
		assert_eq!(keys(&cache)[0], "check_key");

		assert!(cache.remove("check_key"));
		assert!(!cache.remove("check_key"));
		assert_eq!(cache.len(), 4);
		assert_ne!(keys(&cache)[0], "check_key");

		assert!(cache.remove("1"));
		assert_invariants(&cache);

		for key in keys(&cache) {
			assert!(cache.has(&key));
			assert!(cache.get(&key).is_some());
			assert_invariants(&cache);
		}

		cache.clear();
		assert!(cache.is_empty());
	}

	#[test]
	fn clear_keeps_counters() {
		let cache = generate_cache(4);
		cache.get("0");

		cache.clear();

		assert_eq!(cache.len(), 0);
		assert_eq!(cache.hits(), 1);
		assert_eq!(cache.misses(), 4);
		assert!(cache.add("0".to_owned(), "value".to_owned()));
	}

	#[test]
	fn formats_are_correct() {
		let cache = generate_cache(3);
		assert_eq!(cache.to_string(), "<LfuCache (3/3 entries)>");

		cache.set_limit(CacheLimit::Unbounded).unwrap();
		assert_eq!(cache.to_string(), "<LfuCache (3/unbounded entries)>");

		let default = LfuCache::<u32, u32>::default();
		assert_eq!(default.limit(), CacheLimit::Bounded(128));
		assert!(format!("{default:?}").contains("limit: Bounded(128)"));
	}

	#[test]
	fn invariants_hold_under_mixed_operations() {
		let cache = LfuCache::<String, String>::new(16).unwrap();
		let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

		for step in 0..2_000 {
			seed ^= seed << 13;
			seed ^= seed >> 7;
			seed ^= seed << 17;

			let key = (seed % 40).to_string();

			match (seed >> 8) % 10 {
				0..=3 => {
					cache.get(&key);
				},

				4..=6 => {
					cache.add(key, step.to_string());
				},

				7 => {
					cache.add_or_update(key, step.to_string());
				},

				8 => {
					cache.remove(&key);
				},

				_ => {
					let limit = match (seed >> 16) % 4 {
						0 => None,
						bound => Some(bound as usize * 6),
					};

					cache.set_limit(limit).unwrap();
				},
			}

			assert_invariants(&cache);
		}
	}

	#[test]
	fn parallel_access_is_consistent() {
		let cache = LfuCache::<u64, u64>::new(64).unwrap();

		(0..10_000u64).into_par_iter().for_each(|i| {
			let key = i % 100;

			if cache.get(&key).is_none() {
				cache.add(key, key * 2);
			}
		});

		assert!(cache.len() <= 64);
		assert!(cache.hits() + cache.misses() <= 10_000);
		assert!(cache.misses() >= 100);

		for entry in cache.retrieve(..) {
			assert_eq!(*entry.value, entry.key * 2);
		}

		cache.state.lock().stack.assert_invariants();
	}
}
