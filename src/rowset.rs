// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{
	multimap::{NestedRowMultimap, RowMultimap},
	node::NodeRef,
	request::RefreshRequest,
	row::CatalogRow,
};

/// All the rows gathered for one schema refresh, frozen and categorized.
///
/// Built once by [`crate::collect::SchemaRowCollector::finalize`] and handed
/// to the schema object parser. Nothing mutates it afterwards, so it can be
/// shared across threads for reading.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRowSet {
	/// The node the rows were read from.
	pub node: NodeRef,
	/// The refresh request, with its scope possibly rewritten from TABLE
	/// to VIEW during finalization.
	pub request: RefreshRequest,
	/// Name of the column holding a table's name in this server version.
	/// The parser re-reads it from individual column and index rows.
	pub table_name_column: String,
	pub keyspaces: Vec<CatalogRow>,
	pub tables: RowMultimap,
	pub views: RowMultimap,
	pub types: RowMultimap,
	pub functions: RowMultimap,
	pub aggregates: RowMultimap,
	pub columns: NestedRowMultimap,
	pub indexes: NestedRowMultimap,
}
