/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::sync::atomic::{Ordering, AtomicU64};
use crate::limit::CacheLimit;

/// Lifetime hit and miss counters. They are only incremented while the
/// cache lock is held and are never reset, not even by a clear.
#[derive(Default)]
pub struct AtomicStats {
	hits: AtomicU64,
	misses: AtomicU64,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Stats {
	limit: CacheLimit,
	len: usize,

	hits: u64,
	misses: u64,
}

/// This struct holds a point-in-time view of an `LfuCache`.
impl Stats {
	/// Returns the cache's limit.
	#[must_use]
	pub fn get_limit(&self) -> CacheLimit {
		self.limit
	}

	/// Returns the number of entries in the cache.
	#[must_use]
	pub fn get_len(&self) -> usize {
		self.len
	}

	/// Returns the number of reads served from the cache.
	#[must_use]
	pub fn get_hits(&self) -> u64 {
		self.hits
	}

	/// Returns the number of values written into the cache.
	#[must_use]
	pub fn get_misses(&self) -> u64 {
		self.misses
	}

	/// Returns the share of recorded operations which were hits.
	#[must_use]
	pub fn get_hit_ratio(&self) -> f64 {
		let total = self.hits + self.misses;

		if total == 0 {
			return 0.0;
		}

		self.hits as f64 / total as f64
	}
}

impl AtomicStats {
	pub fn hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub fn miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}

	#[must_use]
	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	#[must_use]
	pub fn misses(&self) -> u64 {
		self.misses.load(Ordering::Relaxed)
	}

	#[must_use]
	pub fn to_stats(&self, limit: CacheLimit, len: usize) -> Stats {
		Stats {
			limit,
			len,

			hits: self.hits(),
			misses: self.misses(),
		}
	}
}
