// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use crate::{
	Error,
	diagnostic::{DiagnosticLevel, DiagnosticSink, TracingSink},
	identifier::Identifier,
	multimap::{NestedRowMultimapBuilder, RowMultimapBuilder},
	node::NodeRef,
	request::{RefreshRequest, RefreshScope},
	row::CatalogRow,
	rowset::SchemaRowSet,
};

const KEYSPACE_COLUMN: &str = "keyspace_name";

/// Gathers the rows returned by the queries of one schema refresh,
/// categorizing them by keyspace and, where relevant, table.
///
/// One collector serves exactly one refresh cycle: feed it row batches in
/// any order, then call [`SchemaRowCollector::finalize`] to freeze the
/// result. Rows missing a classification column are dropped with a warning
/// through the diagnostic sink; they never abort the refresh.
pub struct SchemaRowCollector {
	node: NodeRef,
	request: RefreshRequest,
	table_name_column: String,
	label: String,
	sink: Arc<dyn DiagnosticSink>,
	keyspaces: Vec<CatalogRow>,
	tables: RowMultimapBuilder,
	views: RowMultimapBuilder,
	types: RowMultimapBuilder,
	functions: RowMultimapBuilder,
	aggregates: RowMultimapBuilder,
	columns: NestedRowMultimapBuilder,
	indexes: NestedRowMultimapBuilder,
}

impl SchemaRowCollector {
	/// `table_name_column` is the column holding a table's name in this
	/// server version; `label` correlates the diagnostics of one refresh
	/// cycle.
	pub fn new(
		node: NodeRef,
		request: RefreshRequest,
		table_name_column: impl Into<String>,
		label: impl Into<String>,
	) -> Self {
		Self {
			node,
			request,
			table_name_column: table_name_column.into(),
			label: label.into(),
			sink: Arc::new(TracingSink),
			keyspaces: Vec::new(),
			tables: RowMultimapBuilder::new(),
			views: RowMultimapBuilder::new(),
			types: RowMultimapBuilder::new(),
			functions: RowMultimapBuilder::new(),
			aggregates: RowMultimapBuilder::new(),
			columns: NestedRowMultimapBuilder::new(),
			indexes: NestedRowMultimapBuilder::new(),
		}
	}

	/// Replaces the diagnostic sink, which defaults to [`TracingSink`].
	pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
		self.sink = sink;
		self
	}

	/// Keyspace rows are already keyspace scoped, no classification needed.
	pub fn add_keyspace_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		self.keyspaces.extend(rows);
	}

	pub fn add_table_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace(&self.node, &self.label, self.sink.as_ref(), &mut self.tables, row);
		}
	}

	pub fn add_view_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace(&self.node, &self.label, self.sink.as_ref(), &mut self.views, row);
		}
	}

	pub fn add_type_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace(&self.node, &self.label, self.sink.as_ref(), &mut self.types, row);
		}
	}

	pub fn add_function_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace(&self.node, &self.label, self.sink.as_ref(), &mut self.functions, row);
		}
	}

	pub fn add_aggregate_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace(&self.node, &self.label, self.sink.as_ref(), &mut self.aggregates, row);
		}
	}

	pub fn add_column_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace_and_table(
				&self.node,
				&self.label,
				&self.table_name_column,
				self.sink.as_ref(),
				&mut self.columns,
				row,
			);
		}
	}

	pub fn add_index_rows(&mut self, rows: impl IntoIterator<Item = CatalogRow>) {
		for row in rows {
			Self::put_by_keyspace_and_table(
				&self.node,
				&self.label,
				&self.table_name_column,
				self.sink.as_ref(),
				&mut self.indexes,
				row,
			);
		}
	}

	fn put_by_keyspace(
		node: &NodeRef,
		label: &str,
		sink: &dyn DiagnosticSink,
		builder: &mut RowMultimapBuilder,
		row: CatalogRow,
	) {
		match row.get_str(KEYSPACE_COLUMN).map(Identifier::from_internal) {
			Some(keyspace) => builder.put(keyspace, row),
			None => sink.emit(
				DiagnosticLevel::Warn,
				label,
				&format!("skipping system row from {} with missing keyspace name", node),
			),
		}
	}

	fn put_by_keyspace_and_table(
		node: &NodeRef,
		label: &str,
		table_name_column: &str,
		sink: &dyn DiagnosticSink,
		builder: &mut NestedRowMultimapBuilder,
		row: CatalogRow,
	) {
		let keyspace = row.get_str(KEYSPACE_COLUMN).map(Identifier::from_internal);
		let table = row.get_str(table_name_column).map(Identifier::from_internal);
		match (keyspace, table) {
			(Some(keyspace), Some(table)) => builder.put(keyspace, table, row),
			(None, _) => sink.emit(
				DiagnosticLevel::Warn,
				label,
				&format!("skipping system row from {} with missing keyspace name", node),
			),
			(_, None) => sink.emit(
				DiagnosticLevel::Warn,
				label,
				&format!("skipping system row from {} with missing table name", node),
			),
		}
	}

	/// Freezes every bucket and produces the immutable row set.
	///
	/// Fails when a TABLE scoped request did not match exactly one table
	/// or view row; see [`adjust_request`].
	pub fn finalize(self) -> crate::Result<SchemaRowSet> {
		let tables = self.tables.build();
		let views = self.views.build();

		let request = adjust_request(&self.request, tables.row_count(), views.row_count())?;

		Ok(SchemaRowSet {
			node: self.node,
			request,
			table_name_column: self.table_name_column,
			keyspaces: self.keyspaces,
			tables,
			views,
			types: self.types.build(),
			functions: self.functions.build(),
			aggregates: self.aggregates.build(),
			columns: self.columns.build(),
			indexes: self.indexes.build(),
		})
	}
}

/// Settles what a TABLE scoped refresh actually targets.
///
/// The notification behind such a request cannot tell tables and views
/// apart, so the scope is rewritten to VIEW when the single classified row
/// landed in the view bucket. Any count other than exactly one row means
/// the targeted catalog queries answered with an unexpected shape, which is
/// fatal for the refresh cycle. Other scopes pass through untouched.
pub fn adjust_request(
	request: &RefreshRequest,
	table_rows: usize,
	view_rows: usize,
) -> crate::Result<RefreshRequest> {
	if request.scope != RefreshScope::Table {
		return Ok(request.clone());
	}
	if table_rows + view_rows != 1 {
		return Err(Error::UnexpectedTargetRows {
			tables: table_rows,
			views: view_rows,
		});
	}
	if table_rows == 0 {
		Ok(request.with_scope(RefreshScope::View))
	} else {
		Ok(request.clone())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::test_utils::{RecordingSink, element_row, keyspace_row, nested_row};

	const TABLE_NAME: &str = "table_name";

	fn ident(name: &str) -> Identifier {
		Identifier::from_internal(name)
	}

	fn table_request(keyspace: &str, object: &str) -> RefreshRequest {
		RefreshRequest::object(RefreshScope::Table, ident(keyspace), ident(object))
	}

	fn collector(request: RefreshRequest) -> (SchemaRowCollector, Arc<RecordingSink>) {
		let sink = Arc::new(RecordingSink::new());
		let collector = SchemaRowCollector::new(NodeRef::new("10.0.0.1:9042"), request, TABLE_NAME, "test")
			.with_sink(sink.clone());
		(collector, sink)
	}

	#[test]
	fn test_keyspace_rows_pass_through_verbatim() {
		let (mut collector, sink) = collector(RefreshRequest::full_schema());
		collector.add_keyspace_rows([keyspace_row("ks2"), keyspace_row("ks1")]);

		let rows = collector.finalize().unwrap();

		let names: Vec<&str> = rows.keyspaces.iter().map(|row| row.get_str("keyspace_name").unwrap()).collect();
		assert_eq!(names, vec!["ks2", "ks1"]);
		assert_eq!(sink.warning_count(), 0);
	}

	#[test]
	fn test_groups_by_keyspace_preserving_feed_order() {
		let (mut collector, _sink) = collector(RefreshRequest::full_schema());
		collector.add_table_rows([
			element_row("ks1", TABLE_NAME, "t1"),
			element_row("ks2", TABLE_NAME, "t2"),
			element_row("ks1", TABLE_NAME, "t3"),
		]);

		let rows = collector.finalize().unwrap();

		let ks1: Vec<&str> =
			rows.tables.get(&ident("ks1")).iter().map(|row| row.get_str(TABLE_NAME).unwrap()).collect();
		assert_eq!(ks1, vec!["t1", "t3"]);
		assert_eq!(rows.tables.get(&ident("ks2")).len(), 1);
		assert_eq!(rows.tables.key_count(), 2);
	}

	#[test]
	fn test_missing_keyspace_name_warns_and_drops() {
		let (mut collector, sink) = collector(RefreshRequest::full_schema());
		collector.add_type_rows([CatalogRow::new().with("type_name", "address")]);

		let rows = collector.finalize().unwrap();

		assert!(rows.types.is_empty());
		assert_eq!(sink.warning_count(), 1);
		let (_, label, message) = sink.events().pop().unwrap();
		assert_eq!(label, "test");
		assert!(message.contains("10.0.0.1:9042"));
		assert!(message.contains("missing keyspace name"));
	}

	#[test]
	fn test_missing_table_name_warns_and_drops() {
		let (mut collector, sink) = collector(RefreshRequest::full_schema());
		collector.add_column_rows([CatalogRow::new().with("keyspace_name", "ks1").with("column_name", "c1")]);

		let rows = collector.finalize().unwrap();

		assert_eq!(rows.columns.keyspace_count(), 0);
		assert_eq!(sink.warning_count(), 1);
		assert!(sink.events()[0].2.contains("missing table name"));
	}

	#[test]
	fn test_batch_split_does_not_change_grouping() {
		let feed = [
			element_row("ks1", TABLE_NAME, "t1"),
			element_row("ks2", TABLE_NAME, "t2"),
			element_row("ks1", TABLE_NAME, "t3"),
		];

		let (mut one_batch, _) = collector(RefreshRequest::full_schema());
		one_batch.add_table_rows(feed.clone());

		let (mut split, _) = collector(RefreshRequest::full_schema());
		split.add_table_rows(feed[..2].to_vec());
		split.add_table_rows(feed[2..].to_vec());

		assert_eq!(one_batch.finalize().unwrap(), split.finalize().unwrap());
	}

	#[test]
	fn test_table_refresh_matching_a_view_rewrites_scope() {
		let (mut collector, _sink) = collector(table_request("ks1", "v1"));
		collector.add_view_rows([element_row("ks1", "view_name", "v1")]);

		let rows = collector.finalize().unwrap();

		assert_eq!(rows.request.scope, RefreshScope::View);
		assert_eq!(rows.request.keyspace, Some(ident("ks1")));
		assert_eq!(rows.request.object, Some(ident("v1")));
	}

	#[test]
	fn test_table_refresh_matching_a_table_keeps_scope() {
		let (mut collector, _sink) = collector(table_request("ks1", "t1"));
		collector.add_table_rows([element_row("ks1", TABLE_NAME, "t1")]);

		let rows = collector.finalize().unwrap();

		assert_eq!(rows.request.scope, RefreshScope::Table);
	}

	#[test]
	fn test_table_refresh_with_unexpected_counts_fails() {
		let (mut collector, _sink) = collector(table_request("ks1", "t1"));
		collector.add_table_rows([element_row("ks1", TABLE_NAME, "t1"), element_row("ks1", TABLE_NAME, "t1b")]);

		let err = collector.finalize().unwrap_err();

		assert_eq!(
			err,
			Error::UnexpectedTargetRows {
				tables: 2,
				views: 0,
			}
		);
	}

	#[test]
	fn test_table_refresh_with_no_rows_fails() {
		let (collector, _sink) = collector(table_request("ks1", "t1"));

		let err = collector.finalize().unwrap_err();

		assert_eq!(
			err,
			Error::UnexpectedTargetRows {
				tables: 0,
				views: 0,
			}
		);
	}

	#[test]
	fn test_columns_group_by_keyspace_and_table() {
		let (mut collector, _sink) = collector(RefreshRequest::full_schema());
		collector.add_column_rows([
			nested_row("ks1", TABLE_NAME, "t1", "c1"),
			nested_row("ks1", TABLE_NAME, "t2", "c2"),
			nested_row("ks1", TABLE_NAME, "t1", "c3"),
		]);

		let rows = collector.finalize().unwrap();

		let t1: Vec<&str> = rows
			.columns
			.get_rows(&ident("ks1"), &ident("t1"))
			.iter()
			.map(|row| row.get_str("column_name").unwrap())
			.collect();
		assert_eq!(t1, vec!["c1", "c3"]);
		assert_eq!(rows.columns.get_rows(&ident("ks1"), &ident("t2")).len(), 1);
		assert_eq!(rows.columns.keyspace_count(), 1);
	}

	#[test]
	fn test_indexes_use_the_configured_table_column() {
		let (mut collector, sink) = collector(RefreshRequest::full_schema());
		// A row naming its table under a different column must be dropped.
		collector.add_index_rows([
			nested_row("ks1", TABLE_NAME, "t1", "i1"),
			nested_row("ks1", "columnfamily_name", "t1", "i2"),
		]);

		let rows = collector.finalize().unwrap();

		assert_eq!(rows.indexes.get_rows(&ident("ks1"), &ident("t1")).len(), 1);
		assert_eq!(sink.warning_count(), 1);
	}

	#[test]
	fn test_keyspace_scoped_refresh_end_to_end() {
		let request = RefreshRequest::keyspace(ident("ks1"));
		let (mut collector, sink) = collector(request.clone());

		collector.add_keyspace_rows([keyspace_row("ks1"), keyspace_row("ks2")]);
		collector.add_table_rows([
			element_row("ks1", TABLE_NAME, "t1"),
			element_row("ks2", TABLE_NAME, "t2"),
			element_row("ks1", TABLE_NAME, "t3"),
			CatalogRow::new().with(TABLE_NAME, "orphan"),
		]);

		let rows = collector.finalize().unwrap();

		assert_eq!(rows.keyspaces.len(), 2);
		assert_eq!(rows.tables.key_count(), 2);
		assert_eq!(rows.tables.row_count(), 3);
		assert_eq!(sink.warning_count(), 1);
		assert_eq!(rows.request, request);
		assert_eq!(rows.table_name_column, TABLE_NAME);
	}

	#[test]
	fn test_adjust_request_ignores_other_scopes() {
		let request = RefreshRequest::keyspace(ident("ks1"));
		assert_eq!(adjust_request(&request, 0, 0).unwrap(), request);
		assert_eq!(adjust_request(&request, 5, 3).unwrap(), request);
	}

	#[test]
	fn test_adjust_request_rewrites_single_view() {
		let request = table_request("ks1", "v1");
		let adjusted = adjust_request(&request, 0, 1).unwrap();
		assert_eq!(adjusted, request.with_scope(RefreshScope::View));
	}

	#[test]
	fn test_adjust_request_keeps_single_table() {
		let request = table_request("ks1", "t1");
		assert_eq!(adjust_request(&request, 1, 0).unwrap(), request);
	}

	#[test]
	fn test_adjust_request_rejects_ambiguous_counts() {
		let request = table_request("ks1", "t1");
		assert_eq!(
			adjust_request(&request, 1, 1).unwrap_err(),
			Error::UnexpectedTargetRows {
				tables: 1,
				views: 1,
			}
		);
	}
}
