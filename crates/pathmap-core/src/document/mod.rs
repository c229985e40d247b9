//! Path-addressed access to JSON documents
//!
//! This module is the document layer the mapping engine reads from and
//! writes into. A [`Document`] owns a parsed JSON tree and exposes
//! query, set, raw-splice and delete primitives keyed by [`Path`]
//! expressions. Writes create missing intermediate containers: a numeric
//! component on a missing or array parent creates or extends an array
//! (padding with `null`), `-1` appends, anything else creates an object.
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod path;

pub use error::{value_type_name, PathError};
pub use path::{escape_key, KeySegment, Path, Pattern, Segment};

use crate::Result;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A JSON document addressed by path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    root: Value,
}

/// The result of querying a document at a path
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<'a> {
    value: Option<Cow<'a, Value>>,
}

impl Document {
    /// Parse a document from encoded bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            root: serde_json::from_slice(bytes)?,
        })
    }

    /// Wrap an already parsed value
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Borrow the document tree
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Take the document tree
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Encode the document to bytes
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.root)?)
    }

    /// Query the value at `path`
    pub fn get(&self, path: &str) -> Result<Lookup<'_>> {
        let path = Path::parse(path)?;
        Ok(self.get_path(&path))
    }

    /// Query the value at an already parsed path
    pub fn get_path(&self, path: &Path) -> Lookup<'_> {
        Lookup {
            value: select(&self.root, path.segments()),
        }
    }

    /// Write `value` at `path`, creating intermediate containers
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let path = Path::parse(path)?;
        ensure_writable(&path, "set")?;
        write(&mut self.root, path.segments(), value, &path)
    }

    /// Splice pre-encoded JSON bytes at `path`
    pub fn set_raw(&mut self, path: &str, raw: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(raw)?;
        self.set(path, value)
    }

    /// Remove the value at `path`; missing paths are left alone
    pub fn delete(&mut self, path: &str) -> Result<()> {
        let path = Path::parse(path)?;
        ensure_writable(&path, "delete")?;
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Ok(());
        };

        let Some(parent) = select_mut(&mut self.root, parents) else {
            return Ok(());
        };
        if let Segment::Key(key) = last {
            match parent {
                Value::Object(map) => {
                    map.shift_remove(&key.name);
                }
                Value::Array(items) => {
                    if let Some(index) = key.index.filter(|i| *i < items.len()) {
                        items.remove(index);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl<'a> Lookup<'a> {
    /// Whether the path resolved to anything
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the path is absent or holds `null`
    pub fn is_null(&self) -> bool {
        matches!(self.value.as_deref(), None | Some(Value::Null))
    }

    /// The resolved value, if any
    pub fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }

    /// The resolved value encoded as JSON; empty when absent
    pub fn raw(&self) -> Result<Vec<u8>> {
        match self.value.as_deref() {
            Some(value) => Ok(serde_json::to_vec(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Canonical string form of the resolved value
    ///
    /// Strings are returned verbatim, numbers in plain decimal, booleans as
    /// `true`/`false`, objects and arrays as compact JSON, and `null` or a
    /// missing value as the empty string.
    pub fn string_view(&self) -> String {
        match self.value.as_deref() {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => i.to_string(),
                (None, Some(u), _) => u.to_string(),
                (None, None, Some(f)) => f.to_string(),
                (None, None, None) => n.to_string(),
            },
            Some(other) => other.to_string(),
        }
    }
}

fn ensure_writable(path: &Path, operation: &str) -> Result<()> {
    for segment in path.segments() {
        match segment {
            Segment::Key(_) => {}
            Segment::Pattern(p) => {
                return Err(PathError::unsupported(
                    format!("wildcard '{}'", p.as_str()),
                    operation,
                    path.as_str(),
                )
                .into())
            }
            Segment::Each => {
                return Err(PathError::unsupported("'#'", operation, path.as_str()).into())
            }
        }
    }
    Ok(())
}

fn select<'a>(value: &'a Value, segments: &[Segment]) -> Option<Cow<'a, Value>> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Cow::Borrowed(value));
    };

    match first {
        Segment::Key(key) => child(value, key).and_then(|next| select(next, rest)),
        Segment::Pattern(pattern) => match value {
            Value::Object(map) => map
                .iter()
                .filter(|(k, _)| pattern.matches(k))
                .find_map(|(_, next)| select(next, rest)),
            _ => None,
        },
        Segment::Each => {
            let Value::Array(items) = value else {
                return None;
            };
            if rest.is_empty() {
                return Some(Cow::Owned(Value::from(items.len())));
            }
            let collected = items
                .iter()
                .filter_map(|item| select(item, rest).map(Cow::into_owned))
                .collect();
            Some(Cow::Owned(Value::Array(collected)))
        }
    }
}

fn child<'a>(value: &'a Value, key: &KeySegment) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(&key.name),
        Value::Array(items) => key.index.and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Walk literal key segments mutably without creating anything
fn select_mut<'a>(value: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        let Segment::Key(key) = segment else {
            return None;
        };
        current = match current {
            Value::Object(map) => map.get_mut(&key.name)?,
            Value::Array(items) => items.get_mut(key.index?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn write(node: &mut Value, segments: &[Segment], value: Value, path: &Path) -> Result<()> {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return Ok(());
    };
    let Segment::Key(key) = first else {
        return Err(PathError::unsupported("non-literal component", "set", path.as_str()).into());
    };

    // Missing or scalar nodes become the container the component implies.
    if !node.is_object() && !node.is_array() {
        *node = if key.index.is_some() || key.is_append() {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }

    let slot = match node {
        Value::Object(map) => map.entry(key.name.clone()).or_insert(Value::Null),
        Value::Array(items) => {
            let index = if key.is_append() {
                items.len()
            } else {
                key.index.ok_or_else(|| {
                    PathError::type_mismatch("object", "array", path.as_str())
                })?
            };
            if items.len() <= index {
                let len = index.checked_add(1).ok_or_else(|| {
                    PathError::unsupported(format!("array index {}", key.name), "set", path.as_str())
                })?;
                items.resize(len, Value::Null);
            }
            &mut items[index]
        }
        other => {
            return Err(
                PathError::type_mismatch("container", value_type_name(other), path.as_str()).into(),
            )
        }
    };

    write(slot, rest, value, path)
}
