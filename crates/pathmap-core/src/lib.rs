//! Pathmap Core - path-based struct-to-struct mapping over JSON
//!
//! This crate lets two independently defined record types exchange values by
//! name even when their field names, JSON keys, nesting, or primitive types
//! differ. Each mapped field declares a dotted path into an external
//! document; values are read at that path, coerced into the field's declared
//! kind and written where serde expects them.
//!
//! # Main Components
//!
//! - **Document layer**: path queries and sjson-style writes over `serde_json` values
//! - **Annotation reader**: struct-tag style annotations into field directives
//! - **Value resolver**: lookup plus coercion into the declared kind
//! - **Document rewriter**: two-phase application of pending changes
//! - **Mapper**: `marshal`, `unmarshal` and `convert` for records and sequences
//!
//! # Example
//!
//! ```
//! use pathmap_core::{FieldTable, Mapped, Result};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Remote {
//!     #[serde(rename = "uid")]
//!     id: String,
//! }
//!
//! impl Mapped for Remote {
//!     fn field_table() -> FieldTable {
//!         FieldTable::new().field::<String>("id", r#"json:"uid" mapper:"user.id""#)
//!     }
//! }
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Local {
//!     id: u64,
//! }
//!
//! impl Mapped for Local {
//!     fn field_table() -> FieldTable {
//!         FieldTable::new().field::<u64>("id", r#"json:"id" mapper:"user.id""#)
//!     }
//! }
//!
//! fn example() -> Result<()> {
//!     let mut local = Local::default();
//!     pathmap_core::convert(&Remote { id: "10000".to_string() }, &mut local)?;
//!     assert_eq!(local.id, 10000);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod mapper;
pub mod mapping;

// Re-export main types for convenience
pub use config::{MapperConfig, NumericMode, TagVocabulary};
pub use document::{Document, Lookup, Path, PathError};
pub use error::{Error, Result};
pub use mapper::{convert, marshal, unmarshal, Mapper, Source, Target};
pub use mapping::{
    directives, FieldDirective, FieldKind, FieldSpec, FieldTable, FieldType, Kinded, Mapped,
    PendingChange, Resolution, Scalar,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_mapper_uses_default_config() {
        assert_eq!(Mapper::new().config(), &MapperConfig::default());
    }
}
