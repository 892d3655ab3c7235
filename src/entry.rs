/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::sync::Arc;

pub type AccessCount = u64;

pub struct Entry<K, V> {
	key: K,
	value: Arc<V>,
	access_count: AccessCount,
}

/// A snapshot of one cache entry, as returned by
/// [`LfuCache::retrieve`](crate::LfuCache::retrieve).
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CacheEntry<K, V> {
	pub key: K,
	pub value: Arc<V>,
	pub access_count: AccessCount,
}

impl<K, V> Entry<K, V> {
	pub fn new(key: K, value: Arc<V>) -> Self {
		Entry {
			key,
			value,
			access_count: 1,
		}
	}

	pub fn key(&self) -> &K {
		&self.key
	}

	pub fn value(&self) -> Arc<V> {
		self.value.clone()
	}

	pub fn access_count(&self) -> AccessCount {
		self.access_count
	}

	pub fn replace_value(&mut self, value: Arc<V>) {
		self.value = value;
	}

	pub fn touch(&mut self) {
		self.access_count = self.access_count.saturating_add(1);
	}

	pub fn into_key(self) -> K {
		self.key
	}
}

impl<K: Clone, V> Entry<K, V> {
	pub fn snapshot(&self) -> CacheEntry<K, V> {
		CacheEntry {
			key: self.key.clone(),
			value: self.value(),
			access_count: self.access_count,
		}
	}
}
