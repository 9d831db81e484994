// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

/// Severity attached to a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
	Info,
	Warn,
	Error,
}

impl Display for DiagnosticLevel {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			DiagnosticLevel::Info => f.write_str("INFO"),
			DiagnosticLevel::Warn => f.write_str("WARN"),
			DiagnosticLevel::Error => f.write_str("ERROR"),
		}
	}
}

/// Receives out-of-band diagnostics, such as dropped-row warnings.
///
/// The label correlates every event emitted during one refresh cycle.
pub trait DiagnosticSink: Send + Sync {
	fn emit(&self, level: DiagnosticLevel, label: &str, message: &str);
}

/// Default sink, forwarding every event to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn emit(&self, level: DiagnosticLevel, label: &str, message: &str) {
		match level {
			DiagnosticLevel::Info => tracing::info!(label = label, "{}", message),
			DiagnosticLevel::Warn => tracing::warn!(label = label, "{}", message),
			DiagnosticLevel::Error => tracing::error!(label = label, "{}", message),
		}
	}
}
