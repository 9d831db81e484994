// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// The granularity a refresh claims to target.
///
/// A single view change is announced with the [`RefreshScope::Table`] scope,
/// because the originating notification cannot tell tables and views apart;
/// the collector settles it once the rows are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshScope {
	FullSchema,
	Keyspace,
	Table,
	View,
	Type,
	Function,
	Aggregate,
}

impl Display for RefreshScope {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			RefreshScope::FullSchema => f.write_str("FULL_SCHEMA"),
			RefreshScope::Keyspace => f.write_str("KEYSPACE"),
			RefreshScope::Table => f.write_str("TABLE"),
			RefreshScope::View => f.write_str("VIEW"),
			RefreshScope::Type => f.write_str("TYPE"),
			RefreshScope::Function => f.write_str("FUNCTION"),
			RefreshScope::Aggregate => f.write_str("AGGREGATE"),
		}
	}
}

/// Describes what a schema refresh should cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
	pub scope: RefreshScope,
	pub keyspace: Option<Identifier>,
	pub object: Option<Identifier>,
}

impl RefreshRequest {
	/// A refresh of the whole schema.
	pub fn full_schema() -> Self {
		Self {
			scope: RefreshScope::FullSchema,
			keyspace: None,
			object: None,
		}
	}

	/// A refresh of a single keyspace.
	pub fn keyspace(keyspace: Identifier) -> Self {
		Self {
			scope: RefreshScope::Keyspace,
			keyspace: Some(keyspace),
			object: None,
		}
	}

	/// A refresh of one element inside a keyspace.
	pub fn object(scope: RefreshScope, keyspace: Identifier, object: Identifier) -> Self {
		Self {
			scope,
			keyspace: Some(keyspace),
			object: Some(object),
		}
	}

	/// Copy of this request with the scope replaced, all other fields equal.
	pub fn with_scope(&self, scope: RefreshScope) -> Self {
		Self {
			scope,
			..self.clone()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_with_scope_keeps_targets() {
		let request = RefreshRequest::object(
			RefreshScope::Table,
			Identifier::from_internal("ks1"),
			Identifier::from_internal("t1"),
		);

		let adjusted = request.with_scope(RefreshScope::View);

		assert_eq!(adjusted.scope, RefreshScope::View);
		assert_eq!(adjusted.keyspace, request.keyspace);
		assert_eq!(adjusted.object, request.object);
	}
}
