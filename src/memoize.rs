/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	hash::{BuildHasher, Hash, RandomState},
	sync::Arc,
};

use crate::{
	cache::LfuCache,
	config::CacheConfig,
	error::CacheError,
	limit::CacheLimit,
};

/// A function wrapped with its own [`LfuCache`].
///
/// The function's arguments form the cache key. Functions of several
/// arguments take them as a tuple, which keeps the key order-sensitive.
/// Each wrapper owns its cache, so wrapping the same function twice yields
/// two independent caches.
///
/// # Examples
///
/// ```
/// use lfu_cache::Memoized;
///
/// let add = Memoized::new(|&(a, b): &(u64, u64)| a + b, 64).unwrap();
///
/// assert_eq!(*add.call((1, 2)), 3);
/// assert_eq!(*add.call((1, 2)), 3);
///
/// assert_eq!(add.cache().misses(), 1);
/// assert_eq!(add.cache().hits(), 1);
/// ```
pub struct Memoized<A, R, F, S = RandomState> {
	func: F,
	cache: LfuCache<A, R, S>,
}

impl<A, R, F> Memoized<A, R, F, RandomState>
where
	A: Eq + Hash + Clone,
	F: Fn(&A) -> R,
{
	pub fn new<L>(func: F, limit: L) -> Result<Self, CacheError>
	where
		L: TryInto<CacheLimit>,
		CacheError: From<L::Error>,
	{
		Ok(Memoized::from_cache(func, LfuCache::new(limit)?))
	}

	#[must_use]
	pub fn with_config(func: F, config: CacheConfig) -> Self {
		Memoized::from_cache(func, LfuCache::with_config(config))
	}
}

impl<A, R, F, S> Memoized<A, R, F, S>
where
	A: Eq + Hash + Clone,
	F: Fn(&A) -> R,
	S: BuildHasher,
{
	/// Wraps `func` with an existing, typically empty, cache.
	pub fn from_cache(func: F, cache: LfuCache<A, R, S>) -> Self {
		Memoized {
			func,
			cache,
		}
	}

	/// Returns the cached result for `args`, calling the wrapped function
	/// and caching its result if there is none.
	///
	/// The function is called without holding the cache lock, so
	/// concurrent first calls with the same arguments may each compute a
	/// result. The first one to finish is cached.
	pub fn call(&self, args: A) -> Arc<R> {
		if let Some(value) = self.cache.get(&args) {
			return value;
		}

		let value = Arc::new((self.func)(&args));
		self.cache.add_shared(args, value.clone());

		value
	}

	/// Returns the wrapped function, which bypasses the cache.
	pub fn wrapped(&self) -> &F {
		&self.func
	}

	pub fn cache(&self) -> &LfuCache<A, R, S> {
		&self.cache
	}
}
