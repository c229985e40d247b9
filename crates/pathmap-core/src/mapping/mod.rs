//! Field-level mapping machinery
//!
//! A record opts into path mapping by implementing [`Mapped`], which hands
//! the engine a [`FieldTable`] describing its fields. The pieces here turn
//! that table into directives, resolve values out of a document and write
//! them back:
//!
//! - [`directive`] reads annotations into [`FieldDirective`]s
//! - [`resolver`] queries and coerces one field's value
//! - [`rewriter`] applies the collected changes to a document
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

pub mod directive;
pub mod kind;
pub mod resolver;
pub mod rewriter;

pub use directive::{directives, FieldDirective, FieldSpec, FieldTable};
pub use kind::{FieldKind, FieldType, Kinded};
pub use resolver::{resolve, Resolution, Scalar};
pub use rewriter::{apply, PendingChange};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type that takes part in path mapping
///
/// The field table lists the record's fields in declaration order together
/// with their annotations. It is read on every conversion.
///
/// ```
/// use pathmap_core::{FieldTable, Mapped};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Account {
///     id: u64,
///     owner: String,
/// }
///
/// impl Mapped for Account {
///     fn field_table() -> FieldTable {
///         FieldTable::new()
///             .field::<u64>("id", r#"json:"id" mapper:"account.id""#)
///             .field::<String>("owner", r#"json:"owner" mapper:"account.owner,omitempty""#)
///     }
/// }
/// ```
pub trait Mapped: Serialize + DeserializeOwned {
    /// The record's annotated fields
    fn field_table() -> FieldTable;
}

impl<T: Mapped> Mapped for Box<T> {
    fn field_table() -> FieldTable {
        T::field_table()
    }
}
