//! Document rewriter
//!
//! Changes for a record are collected in full before any is written, so
//! every value is read from the unmodified document. They are then applied
//! in declaration order; when two fields target the same path the later
//! one wins.
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use super::resolver::Scalar;
use crate::document::Document;
use crate::error::Result;
use tracing::trace;

/// A write waiting to be applied to a document
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    /// Write a coerced scalar
    Set { path: String, value: Scalar },
    /// Splice encoded JSON
    SetRaw { path: String, raw: Vec<u8> },
    /// Remove whatever is at the path
    Delete { path: String },
}

impl PendingChange {
    /// The path this change writes to
    pub fn path(&self) -> &str {
        match self {
            PendingChange::Set { path, .. }
            | PendingChange::SetRaw { path, .. }
            | PendingChange::Delete { path } => path,
        }
    }
}

/// Apply `changes` to `document` in order
pub fn apply(mut document: Document, changes: Vec<PendingChange>) -> Result<Document> {
    for change in changes {
        trace!(path = change.path(), change = ?change, "applying change");
        match change {
            PendingChange::Set { path, value } => document.set(&path, value.into_value())?,
            PendingChange::SetRaw { path, raw } => document.set_raw(&path, &raw)?,
            PendingChange::Delete { path } => document.delete(&path)?,
        }
    }
    Ok(document)
}
