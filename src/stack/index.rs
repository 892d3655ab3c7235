/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	borrow::Borrow,
	collections::HashMap,
	hash::{BuildHasher, Hash},
};

use crate::stack::Slot;

/// Maps every key to its current slot in the priority sequence.
pub struct FrequencyIndex<K, S> {
	slots: HashMap<K, Slot, S>,
}

impl<K, S> FrequencyIndex<K, S>
where
	K: Eq + Hash,
	S: BuildHasher,
{
	pub fn with_hasher(hasher: S) -> Self {
		FrequencyIndex {
			slots: HashMap::with_hasher(hasher),
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn lookup<Q>(&self, key: &Q) -> Option<Slot>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.slots.get(key).copied()
	}

	pub fn set(&mut self, key: K, slot: Slot) {
		self.slots.insert(key, slot);
	}

	/// Moves an already indexed key to a new slot.
	pub fn reposition<Q>(&mut self, key: &Q, slot: Slot)
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		let current = self.slots.get_mut(key);
		debug_assert!(current.is_some(), "repositioned key is not indexed");

		if let Some(current) = current {
			*current = slot;
		}
	}

	pub fn delete<Q>(&mut self, key: &Q) -> Option<Slot>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.slots.remove(key)
	}

	pub fn clear(&mut self) {
		self.slots.clear();
	}

	#[cfg(test)]
	pub fn iter(&self) -> impl Iterator<Item = (&K, Slot)> {
		self.slots.iter().map(|(key, slot)| (key, *slot))
	}
}
