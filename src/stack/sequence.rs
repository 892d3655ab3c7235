/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::{
	entry::{Entry, AccessCount},
	stack::Slot,
};

/// Entries ordered by non-increasing access count. Slot 0 holds the most
/// frequently used entry, the last slot holds the eviction candidate.
pub struct PrioritySequence<K, V> {
	entries: Vec<Entry<K, V>>,
}

impl<K, V> PrioritySequence<K, V> {
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn entry(&self, slot: Slot) -> &Entry<K, V> {
		&self.entries[slot]
	}

	pub fn entry_mut(&mut self, slot: Slot) -> &mut Entry<K, V> {
		&mut self.entries[slot]
	}

	pub fn key(&self, slot: Slot) -> &K {
		self.entries[slot].key()
	}

	pub fn access_count(&self, slot: Slot) -> AccessCount {
		self.entries[slot].access_count()
	}

	/// Appends the entry at the lowest priority and returns its slot.
	pub fn push(&mut self, entry: Entry<K, V>) -> Slot {
		self.entries.push(entry);
		self.entries.len() - 1
	}

	pub fn pop(&mut self) -> Option<Entry<K, V>> {
		self.entries.pop()
	}

	/// Removes the entry at `slot`, shifting every later entry one slot
	/// to the left.
	pub fn remove(&mut self, slot: Slot) -> Option<Entry<K, V>> {
		if slot >= self.entries.len() {
			return None;
		}

		Some(self.entries.remove(slot))
	}

	pub fn swap(&mut self, a: Slot, b: Slot) {
		self.entries.swap(a, b);
	}

	pub fn slice(&self, start: Slot, end: Slot) -> &[Entry<K, V>] {
		&self.entries[start..end]
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

impl<K, V> Default for PrioritySequence<K, V> {
	fn default() -> Self {
		PrioritySequence {
			entries: Vec::new(),
		}
	}
}
