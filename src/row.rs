// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A loosely typed value inside a catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowValue {
	Null,
	Bool(bool),
	Int(i64),
	Text(String),
}

impl From<&str> for RowValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for RowValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for RowValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for RowValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

/// One record returned by a system catalog query.
///
/// Rows are produced by the admin query layer and never mutated here;
/// classification only reads the name columns. Column order is the order the
/// server returned them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRow {
	columns: IndexMap<String, RowValue>,
}

impl CatalogRow {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a column, replacing any previous value under the same name.
	pub fn with(mut self, column: impl Into<String>, value: impl Into<RowValue>) -> Self {
		self.columns.insert(column.into(), value.into());
		self
	}

	/// The text value of `column`, or `None` when the column is absent,
	/// null, or not text.
	pub fn get_str(&self, column: &str) -> Option<&str> {
		match self.columns.get(column) {
			Some(RowValue::Text(text)) => Some(text),
			_ => None,
		}
	}

	pub fn get_bool(&self, column: &str) -> Option<bool> {
		match self.columns.get(column) {
			Some(RowValue::Bool(value)) => Some(*value),
			_ => None,
		}
	}

	pub fn get_i64(&self, column: &str) -> Option<i64> {
		match self.columns.get(column) {
			Some(RowValue::Int(value)) => Some(*value),
			_ => None,
		}
	}

	pub fn contains(&self, column: &str) -> bool {
		self.columns.contains_key(column)
	}
}
