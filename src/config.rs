/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use serde::Deserialize;
use crate::limit::CacheLimit;

/// Construction parameters for an [`LfuCache`](crate::LfuCache).
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
	pub limit: CacheLimit,
}

impl CacheConfig {
	#[must_use]
	pub fn new(limit: CacheLimit) -> Self {
		CacheConfig {
			limit,
		}
	}
}
