// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identity of the node a batch of catalog rows was read from.
///
/// Only used for attribution: it shows up in diagnostics and travels with
/// the finalized row set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
	endpoint: String,
}

impl NodeRef {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
		}
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

impl Display for NodeRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.endpoint)
	}
}
