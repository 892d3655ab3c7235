/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::convert::Infallible;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum CacheError {
	#[error("the cache limit cannot be negative (got {0})")]
	NegativeLimit(i64),

	#[error("the cache limit must be a non-negative integer or unbounded (got {0:?})")]
	InvalidLimit(String),
}

impl From<Infallible> for CacheError {
	fn from(err: Infallible) -> Self {
		match err {}
	}
}
