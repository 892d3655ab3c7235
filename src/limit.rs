/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	fmt::{self, Display},
	str::FromStr,
};

use serde::{
	Deserialize,
	de::{self, Deserializer, Visitor},
};

use crate::error::CacheError;

pub const DEFAULT_LIMIT: usize = 128;

/// The maximum number of entries a cache may hold.
///
/// A limit of zero blocks the cache for writing: every insertion of a new
/// key is rejected.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum CacheLimit {
	Bounded(usize),
	Unbounded,
}

impl CacheLimit {
	/// Returns the numeric bound, or `None` if the limit is unbounded.
	#[must_use]
	pub fn get(&self) -> Option<usize> {
		match self {
			CacheLimit::Bounded(limit) => Some(*limit),
			CacheLimit::Unbounded => None,
		}
	}

	#[must_use]
	pub fn is_bounded(&self) -> bool {
		matches!(self, CacheLimit::Bounded(_))
	}

	/// Returns `true` if no new keys may be inserted at all.
	#[must_use]
	pub fn is_blocked(&self) -> bool {
		matches!(self, CacheLimit::Bounded(0))
	}

	/// Returns `true` if a cache holding `len` entries has no room for
	/// another one.
	#[must_use]
	pub fn is_full(&self, len: usize) -> bool {
		self.get().is_some_and(|limit| len >= limit)
	}
}

impl Default for CacheLimit {
	fn default() -> Self {
		CacheLimit::Bounded(DEFAULT_LIMIT)
	}
}

impl Display for CacheLimit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CacheLimit::Bounded(limit) => write!(f, "{limit}"),
			CacheLimit::Unbounded => write!(f, "unbounded"),
		}
	}
}

impl From<usize> for CacheLimit {
	fn from(limit: usize) -> Self {
		CacheLimit::Bounded(limit)
	}
}

impl From<Option<usize>> for CacheLimit {
	fn from(limit: Option<usize>) -> Self {
		match limit {
			Some(limit) => CacheLimit::Bounded(limit),
			None => CacheLimit::Unbounded,
		}
	}
}

impl TryFrom<i64> for CacheLimit {
	type Error = CacheError;

	fn try_from(limit: i64) -> Result<Self, Self::Error> {
		usize::try_from(limit)
			.map(CacheLimit::Bounded)
			.map_err(|_| CacheError::NegativeLimit(limit))
	}
}

impl TryFrom<i32> for CacheLimit {
	type Error = CacheError;

	fn try_from(limit: i32) -> Result<Self, Self::Error> {
		CacheLimit::try_from(i64::from(limit))
	}
}

impl TryFrom<&str> for CacheLimit {
	type Error = CacheError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		CacheLimit::from_str(s)
	}
}

impl FromStr for CacheLimit {
	type Err = CacheError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();

		match trimmed.to_ascii_lowercase().as_str() {
			"none" | "unbounded" | "inf" => return Ok(CacheLimit::Unbounded),
			_ => {},
		}

		if let Ok(limit) = trimmed.parse::<usize>() {
			return Ok(CacheLimit::Bounded(limit));
		}

		match trimmed.parse::<i64>() {
			Ok(limit) => Err(CacheError::NegativeLimit(limit)),
			Err(_) => Err(CacheError::InvalidLimit(s.to_owned())),
		}
	}
}

impl<'a> Deserialize<'a> for CacheLimit {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'a>,
	{
		deserializer.deserialize_any(CacheLimitVisitor)
	}
}

struct CacheLimitVisitor;

impl<'a> Visitor<'a> for CacheLimitVisitor {
	type Value = CacheLimit;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a non-negative integer, \"unbounded\" or null")
	}

	fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		usize::try_from(value)
			.map(CacheLimit::Bounded)
			.map_err(|_| E::custom(CacheError::InvalidLimit(value.to_string())))
	}

	fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		CacheLimit::try_from(value)
			.map_err(|err| E::custom(err.to_string()))
	}

	fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		CacheLimit::from_str(value)
			.map_err(|err| E::custom(err.to_string()))
	}

	fn visit_unit<E>(self) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		Ok(CacheLimit::Unbounded)
	}

	fn visit_none<E>(self) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		Ok(CacheLimit::Unbounded)
	}

	fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
	where
		D: Deserializer<'a>,
	{
		deserializer.deserialize_any(CacheLimitVisitor)
	}
}
