// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;

use crate::{identifier::Identifier, row::CatalogRow};

/// Frozen, insertion-ordered mapping from an identifier to the rows
/// classified under it.
///
/// Keys iterate in first-insertion order; rows under one key keep the order
/// they were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMultimap {
	entries: IndexMap<Identifier, Vec<CatalogRow>>,
}

impl RowMultimap {
	/// Rows under `key`, empty for a key that was never inserted.
	pub fn get(&self, key: &Identifier) -> &[CatalogRow] {
		self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn keys(&self) -> impl Iterator<Item = &Identifier> {
		self.entries.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &[CatalogRow])> {
		self.entries.iter().map(|(key, rows)| (key, rows.as_slice()))
	}

	/// Number of distinct keys.
	pub fn key_count(&self) -> usize {
		self.entries.len()
	}

	/// Total number of rows across all keys.
	pub fn row_count(&self) -> usize {
		self.entries.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Append-only builder for [`RowMultimap`].
#[derive(Debug, Default)]
pub struct RowMultimapBuilder {
	entries: IndexMap<Identifier, Vec<CatalogRow>>,
}

impl RowMultimapBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn put(&mut self, key: Identifier, row: CatalogRow) {
		self.entries.entry(key).or_default().push(row);
	}

	pub fn build(self) -> RowMultimap {
		RowMultimap {
			entries: self.entries,
		}
	}
}

/// Frozen two-level mapping from keyspace to an independently frozen
/// [`RowMultimap`].
///
/// Every keyspace present here holds at least one row; inner maps are only
/// ever created when a row lands in them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRowMultimap {
	entries: IndexMap<Identifier, RowMultimap>,
}

impl NestedRowMultimap {
	pub fn get(&self, keyspace: &Identifier) -> Option<&RowMultimap> {
		self.entries.get(keyspace)
	}

	/// Rows under (`keyspace`, `key`), empty when either level is missing.
	pub fn get_rows(&self, keyspace: &Identifier, key: &Identifier) -> &[CatalogRow] {
		self.entries.get(keyspace).map(|inner| inner.get(key)).unwrap_or(&[])
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &RowMultimap)> {
		self.entries.iter()
	}

	pub fn keyspace_count(&self) -> usize {
		self.entries.len()
	}
}

/// Builder keeping one lazily created [`RowMultimapBuilder`] per keyspace.
#[derive(Debug, Default)]
pub struct NestedRowMultimapBuilder {
	builders: IndexMap<Identifier, RowMultimapBuilder>,
}

impl NestedRowMultimapBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn put(&mut self, keyspace: Identifier, key: Identifier, row: CatalogRow) {
		self.builders.entry(keyspace).or_default().put(key, row);
	}

	pub fn build(self) -> NestedRowMultimap {
		let entries = self
			.builders
			.into_iter()
			.map(|(keyspace, builder)| (keyspace, builder.build()))
			.collect();
		NestedRowMultimap {
			entries,
		}
	}
}
