/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod index;
mod sequence;

use std::{
	borrow::Borrow,
	hash::{BuildHasher, Hash},
	ops::{Bound, RangeBounds},
	sync::Arc,
};

use log::trace;

use crate::{
	entry::{Entry, CacheEntry},
	stack::{index::FrequencyIndex, sequence::PrioritySequence},
};

/// A dense position in the priority sequence. Slots are not stable: they
/// change whenever an entry is promoted or an earlier entry is removed.
pub type Slot = usize;

/// The ordered frequency structure backing an LFU cache.
///
/// Entries live in a flat sequence sorted by non-increasing access count,
/// and a key-to-slot index makes every key addressable in O(1). Every
/// mutation keeps `index[key]` pointing at the slot holding `key`.
///
/// Cost model:
/// * insertion and lookup are O(1),
/// * promotion is O(distance moved), usually a single step,
/// * removal at slot `i` is O(n - i) since every later entry is shifted
///   left and re-indexed.
pub struct LfuStack<K, V, S> {
	index: FrequencyIndex<K, S>,
	sequence: PrioritySequence<K, V>,
}

impl<K, V, S> LfuStack<K, V, S> {
	pub fn len(&self) -> usize {
		self.sequence.len()
	}
}

impl<K, V, S> LfuStack<K, V, S>
where
	K: Eq + Hash + Clone,
	S: BuildHasher,
{
	pub fn with_hasher(hasher: S) -> Self {
		LfuStack {
			index: FrequencyIndex::with_hasher(hasher),
			sequence: PrioritySequence::default(),
		}
	}

	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.index.lookup(key).is_some()
	}

	/// Appends a new entry at the lowest priority with an access count
	/// of one. The key must not already be present.
	pub fn insert(&mut self, key: K, value: Arc<V>) -> Slot {
		debug_assert!(!self.contains(&key), "inserted key is already indexed");

		let slot = self.sequence.push(Entry::new(key.clone(), value));
		self.index.set(key, slot);

		slot
	}

	/// Counts one access to the key and returns its value, or `None` if
	/// the key is absent.
	pub fn access<Q>(&mut self, key: &Q) -> Option<Arc<V>>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		let slot = self.touch(key)?;
		Some(self.sequence.entry(slot).value())
	}

	/// Counts one access to the key and replaces its value. Returns `false`
	/// if the key is absent.
	pub fn update<Q>(&mut self, key: &Q, value: Arc<V>) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		let Some(slot) = self.touch(key) else {
			return false;
		};

		self.sequence.entry_mut(slot).replace_value(value);

		true
	}

	pub fn remove<Q>(&mut self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		let Some(slot) = self.index.lookup(key) else {
			return false;
		};

		self.remove_at(slot).is_some()
	}

	/// Removes the entry at `slot` and re-indexes every entry after it.
	pub fn remove_at(&mut self, slot: Slot) -> Option<K> {
		let entry = self.sequence.remove(slot)?;
		self.index.delete(entry.key());

		for shifted in slot..self.sequence.len() {
			self.index.reposition(self.sequence.key(shifted), shifted);
		}

		Some(entry.into_key())
	}

	/// Makes room for one more entry under `limit` by removing the entry
	/// in the last slot the limit allows, which under a respected limit is
	/// the lowest-priority entry.
	pub fn evict(&mut self, limit: usize) -> Option<K> {
		let slot = limit.checked_sub(1)?;
		self.remove_at(slot)
	}

	/// Drops lowest-priority entries until at most `limit` remain and
	/// returns the number of entries dropped.
	pub fn truncate(&mut self, limit: usize) -> usize {
		let mut dropped = 0;

		while self.sequence.len() > limit {
			let Some(entry) = self.sequence.pop() else {
				break;
			};

			self.index.delete(entry.key());
			dropped += 1;
		}

		dropped
	}

	pub fn clear(&mut self) {
		self.index.clear();
		self.sequence.clear();
	}

	/// Returns snapshots of the entries in `range`, highest priority first.
	/// Bounds past the end of the sequence are clamped.
	pub fn retrieve<R>(&self, range: R) -> Vec<CacheEntry<K, V>>
	where
		R: RangeBounds<Slot>,
	{
		let len = self.sequence.len();

		let start = match range.start_bound() {
			Bound::Included(start) => *start,
			Bound::Excluded(start) => start.saturating_add(1),
			Bound::Unbounded => 0,
		}.min(len);

		let end = match range.end_bound() {
			Bound::Included(end) => end.saturating_add(1),
			Bound::Excluded(end) => *end,
			Bound::Unbounded => len,
		}.min(len);

		if start >= end {
			return Vec::new();
		}

		self.sequence
			.slice(start, end)
			.iter()
			.map(Entry::snapshot)
			.collect()
	}

	fn touch<Q>(&mut self, key: &Q) -> Option<Slot>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		let slot = self.index.lookup(key)?;

		self.sequence.entry_mut(slot).touch();
		Some(self.promote(slot))
	}

	/// Bubbles the entry at `slot` towards the front while its access count
	/// is strictly greater than its left neighbour's. Equal counts do not
	/// swap. Returns the entry's final slot.
	fn promote(&mut self, slot: Slot) -> Slot {
		let origin = slot;
		let mut slot = slot;

		while slot > 0 && self.sequence.access_count(slot) > self.sequence.access_count(slot - 1) {
			self.sequence.swap(slot, slot - 1);
			self.index.reposition(self.sequence.key(slot), slot);

			slot -= 1;
		}

		if slot != origin {
			self.index.reposition(self.sequence.key(slot), slot);
			trace!("promoted entry from slot {origin} to slot {slot}");
		}

		slot
	}

	#[cfg(test)]
	pub fn assert_invariants(&self) {
		assert_eq!(self.index.len(), self.sequence.len());

		for (key, slot) in self.index.iter() {
			assert!(slot < self.sequence.len());
			assert!(self.sequence.key(slot) == key);
		}

		for slot in 0..self.sequence.len() {
			assert!(self.sequence.access_count(slot) > 0);

			if slot > 0 {
				assert!(self.sequence.access_count(slot - 1) >= self.sequence.access_count(slot));
			}
		}
	}
}
