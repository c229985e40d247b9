//! Annotation reader
//!
//! Turns a record's [`FieldTable`] into the ordered list of
//! [`FieldDirective`]s the engine works from. Annotations are written in
//! struct-tag syntax (`json:"name,omitempty" mapper:"path.to.value"`) and
//! parsed on every call.
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use super::kind::{FieldType, Kinded};
use crate::config::TagVocabulary;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Declared fields of a record, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldTable {
    fields: Vec<FieldSpec>,
}

/// One declared field: identifier, kind and raw annotations
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub ident: String,
    pub field_type: FieldType,
    tag_literal: String,
    tag_pairs: Vec<(String, String)>,
}

/// Everything the engine needs to move one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDirective {
    /// Field identifier, used in error messages
    pub ident: String,
    /// Key the baseline encoding uses for the field
    pub name: String,
    /// Location of the field in the mapped document
    pub path: String,
    /// Declared kind of the field
    pub field_type: FieldType,
    /// Render the value through its string form
    pub as_string: bool,
    /// Drop the value when it is empty
    pub omit_empty: bool,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field whose kind follows from its Rust type
    pub fn field<T: Kinded>(self, ident: impl Into<String>, tags: impl Into<String>) -> Self {
        self.field_of(ident, T::FIELD_TYPE, tags)
    }

    /// Declare a field with an explicit kind
    pub fn field_of(
        mut self,
        ident: impl Into<String>,
        field_type: impl Into<FieldType>,
        tags: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec::new(ident, field_type).with_literal(tags));
        self
    }

    /// Declare a fully built field spec
    pub fn spec(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldSpec {
    /// Create a field with no annotations
    pub fn new(ident: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            ident: ident.into(),
            field_type: field_type.into(),
            tag_literal: String::new(),
            tag_pairs: Vec::new(),
        }
    }

    /// Attach a struct-tag literal
    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.tag_literal = literal.into();
        self
    }

    /// Attach a single annotation; it takes precedence over the literal
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tag_pairs.push((key.into(), value.into()));
        self
    }

    /// Look up the annotation value stored under `key`
    pub fn lookup(&self, key: &str) -> Result<Option<String>> {
        if let Some((_, value)) = self.tag_pairs.iter().rev().find(|(k, _)| k == key) {
            return Ok(Some(value.clone()));
        }
        let parsed = parse_tag_literal(&self.tag_literal)
            .map_err(|message| Error::Annotation {
                field: self.ident.clone(),
                message,
            })?;
        Ok(parsed.into_iter().find(|(k, _)| k == key).map(|(_, v)| v))
    }
}

/// Read the directives of every mapped field in `table`
pub fn directives(table: &FieldTable, tags: &TagVocabulary) -> Result<Vec<FieldDirective>> {
    let mut seen = HashSet::with_capacity(table.len());
    let mut result = Vec::with_capacity(table.len());

    for spec in table.fields() {
        if !seen.insert(spec.ident.as_str()) {
            return Err(Error::illegal_state(
                format!("field '{}' is declared more than once", spec.ident),
                Some(spec.ident.as_str()),
            ));
        }
        if let Some(directive) = read_field(spec, tags)? {
            result.push(directive);
        }
    }

    Ok(result)
}

fn read_field(spec: &FieldSpec, tags: &TagVocabulary) -> Result<Option<FieldDirective>> {
    let mapping = match spec.lookup(&tags.mapping)? {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };

    let name = spec
        .lookup(&tags.name)?
        .and_then(|value| value.split(',').next().map(|n| n.trim().to_string()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| spec.ident.clone());

    let mut path = None;
    let mut as_string = false;
    let mut omit_empty = false;
    for token in mapping.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        if token == tags.as_string {
            as_string = true;
        } else if token == tags.omit_empty {
            omit_empty = true;
        } else {
            path = Some(token.to_string());
        }
    }

    let path = path.unwrap_or_else(|| name.clone());
    Ok(Some(FieldDirective {
        ident: spec.ident.clone(),
        name,
        path,
        field_type: spec.field_type,
        as_string,
        omit_empty,
    }))
}

/// Split a struct-tag literal into its `key:"value"` pairs
fn parse_tag_literal(literal: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut chars = literal.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| *c == ' ').is_some() {}
        let Some(&(start, _)) = chars.peek() else {
            break;
        };

        let mut key = String::new();
        while let Some((_, c)) = chars.next_if(|(_, c)| *c > ' ' && *c != ':' && *c != '"' && *c != '\x7f') {
            key.push(c);
        }
        if key.is_empty() {
            return Err(format!("expected a tag key at offset {}", start));
        }
        if chars.next_if(|(_, c)| *c == ':').is_none() {
            return Err(format!("missing ':' after tag key '{}'", key));
        }
        if chars.next_if(|(_, c)| *c == '"').is_none() {
            return Err(format!("value of tag '{}' must be quoted", key));
        }

        let mut value = String::new();
        let mut closed = false;
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    closed = true;
                    break;
                }
                '\\' => match chars.next() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, other)) => {
                        return Err(format!("unsupported escape '\\{}' at offset {}", other, offset))
                    }
                    None => break,
                },
                other => value.push(other),
            }
        }
        if !closed {
            return Err(format!("unterminated value for tag '{}'", key));
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}
