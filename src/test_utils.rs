// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Mutex;

use crate::{
	diagnostic::{DiagnosticLevel, DiagnosticSink},
	row::CatalogRow,
};

/// Row with only a keyspace name, as returned by the keyspaces catalog table.
pub fn keyspace_row(keyspace: &str) -> CatalogRow {
	CatalogRow::new().with("keyspace_name", keyspace)
}

/// Row for a keyspace scoped element such as a table, view, type, function
/// or aggregate. `name_column` is the column the element's own name lives in.
pub fn element_row(keyspace: &str, name_column: &str, name: &str) -> CatalogRow {
	CatalogRow::new().with("keyspace_name", keyspace).with(name_column, name)
}

/// Row for a column or index, scoped to a keyspace and a table.
pub fn nested_row(keyspace: &str, table_column: &str, table: &str, name: &str) -> CatalogRow {
	CatalogRow::new().with("keyspace_name", keyspace).with(table_column, table).with("column_name", name)
}

/// A recorded diagnostic event: level, correlation label, message.
pub type DiagnosticEvent = (DiagnosticLevel, String, String);

/// Sink that records every event, so tests can assert on dropped-row
/// warnings without capturing log output.
#[derive(Debug, Default)]
pub struct RecordingSink {
	events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> Vec<DiagnosticEvent> {
		self.events.lock().unwrap().clone()
	}

	pub fn warning_count(&self) -> usize {
		self.events.lock().unwrap().iter().filter(|(level, _, _)| *level == DiagnosticLevel::Warn).count()
	}
}

impl DiagnosticSink for RecordingSink {
	fn emit(&self, level: DiagnosticLevel, label: &str, message: &str) {
		self.events.lock().unwrap().push((level, label.to_string(), message.to_string()));
	}
}
