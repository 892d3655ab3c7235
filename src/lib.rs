/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! A thread-safe least-frequently-used cache which keeps its entries
//! ordered by access count, plus a memoizing function wrapper built on it.

mod cache;
mod config;
mod entry;
mod error;
mod limit;
mod memoize;
mod stack;
mod stats;

pub use crate::{
	cache::LfuCache,
	config::CacheConfig,
	entry::{AccessCount, CacheEntry},
	error::CacheError,
	limit::{CacheLimit, DEFAULT_LIMIT},
	memoize::Memoized,
	stats::Stats,
};
