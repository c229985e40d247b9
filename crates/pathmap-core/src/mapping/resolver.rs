//! Value resolver
//!
//! Reads one field's value out of a document and coerces it into the
//! field's declared kind. Scalars are parsed from the value's canonical
//! string form, so `"10000"` resolves to an integer field as `10000` and a
//! number resolves to a string field as its decimal text. Records, maps and
//! sequences are carried over as raw JSON.
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use super::directive::FieldDirective;
use super::kind::FieldKind;
use crate::config::NumericMode;
use crate::document::{Document, Lookup};
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::trace;

/// A coerced primitive value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
}

/// Outcome of resolving one field
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A coerced scalar to write
    Value(Scalar),
    /// Encoded JSON to splice in as is
    Raw(Vec<u8>),
    /// The value is empty and the field asks for it to be dropped
    Omit,
    /// Nothing to write; the destination keeps what it has
    Unset,
}

impl Scalar {
    /// Whether this is the zero value of its kind
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Uint(u) => *u == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::String(s) => s.is_empty(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::from(i),
            Scalar::Uint(u) => Value::from(u),
            Scalar::Float(f) => Value::from(f),
            Scalar::String(s) => Value::String(s),
        }
    }
}

impl Resolution {
    /// Whether the resolved value counts as empty for omission
    pub fn is_empty(&self) -> bool {
        match self {
            Resolution::Value(scalar) => scalar.is_empty(),
            Resolution::Raw(raw) => matches!(raw.as_slice(), b"" | b"[]" | b"{}" | b"null"),
            Resolution::Omit | Resolution::Unset => true,
        }
    }
}

/// Resolve the value at `path` for `directive`
pub fn resolve(
    document: &Document,
    path: &str,
    directive: &FieldDirective,
    mode: NumericMode,
) -> Result<Resolution> {
    let lookup = document.get(path)?;

    let resolved = if directive.as_string {
        Resolution::Value(Scalar::String(lookup.string_view()))
    } else {
        coerce(&lookup, directive, mode)?
    };

    let resolved = if directive.omit_empty && resolved.is_empty() {
        Resolution::Omit
    } else {
        resolved
    };

    trace!(
        field = %directive.ident,
        path = %path,
        kind = %directive.field_type,
        resolution = ?resolved,
        "resolved field"
    );
    Ok(resolved)
}

fn coerce(lookup: &Lookup<'_>, directive: &FieldDirective, mode: NumericMode) -> Result<Resolution> {
    let field_type = directive.field_type;
    if field_type.nullable && lookup.is_null() {
        return Ok(Resolution::Value(Scalar::Null));
    }

    let kind = field_type.kind;
    if kind.is_composite() {
        return Ok(match lookup.value() {
            Some(value) if !value.is_null() => Resolution::Raw(lookup.raw()?),
            _ => match kind {
                FieldKind::Seq => Resolution::Raw(b"[]".to_vec()),
                FieldKind::Map => Resolution::Raw(b"{}".to_vec()),
                _ => Resolution::Unset,
            },
        });
    }

    let text = lookup.string_view();
    let scalar = match kind {
        FieldKind::String | FieldKind::Other => Scalar::String(text),
        FieldKind::Bool => Scalar::Bool(parse_bool(&text, directive)?),
        FieldKind::F32 | FieldKind::F64 => parse_float(&text, kind, directive, mode)?,
        _ if kind.is_integer() => parse_integer(&text, kind, directive, mode)?,
        _ => {
            return Err(Error::illegal_state(
                format!("no coercion rule for kind {}", kind),
                Some(directive.ident.as_str()),
            ))
        }
    };
    Ok(Resolution::Value(scalar))
}

fn parse_bool(text: &str, directive: &FieldDirective) -> Result<bool> {
    match text {
        "" => Ok(false),
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::parse(&directive.ident, text, "bool")),
    }
}

fn parse_float(text: &str, kind: FieldKind, directive: &FieldDirective, mode: NumericMode) -> Result<Scalar> {
    if text.is_empty() {
        return Ok(Scalar::Float(0.0));
    }

    let wide: f64 = text
        .parse()
        .map_err(|_| Error::parse(&directive.ident, text, kind.to_string()))?;
    if !wide.is_finite() {
        return Err(non_finite(directive, text));
    }
    if kind == FieldKind::F64 {
        return Ok(Scalar::Float(wide));
    }

    let narrowed = wide as f32;
    if !narrowed.is_finite() {
        return Err(match mode {
            NumericMode::Checked => overflow(directive, text, kind),
            NumericMode::Truncate => non_finite(directive, text),
        });
    }
    // Shortest f32 text read back as f64, so 0.1f32 stays 0.1
    let shortest = narrowed.to_string().parse().unwrap_or(f64::from(narrowed));
    Ok(Scalar::Float(shortest))
}

fn parse_integer(text: &str, kind: FieldKind, directive: &FieldDirective, mode: NumericMode) -> Result<Scalar> {
    if text.is_empty() {
        return narrow(0, text, kind, directive, mode);
    }

    let wide: i128 = if text.contains(['.', 'e', 'E']) {
        truncate_float(text, kind, directive, mode)?
    } else {
        match text.parse() {
            Ok(wide) => wide,
            // Digits beyond i128, such as a large float rendered in plain decimal
            Err(_) if is_decimal_digits(text) => truncate_float(text, kind, directive, mode)?,
            Err(_) => return Err(Error::parse(&directive.ident, text, kind.to_string())),
        }
    };

    narrow(wide, text, kind, directive, mode)
}

fn truncate_float(text: &str, kind: FieldKind, directive: &FieldDirective, mode: NumericMode) -> Result<i128> {
    let float: f64 = text
        .parse()
        .map_err(|_| Error::parse(&directive.ident, text, kind.to_string()))?;
    if !float.is_finite() {
        return Err(non_finite(directive, text));
    }
    let truncated = float.trunc();
    if mode == NumericMode::Checked && (truncated < i128::MIN as f64 || truncated >= i128::MAX as f64) {
        return Err(overflow(directive, text, kind));
    }
    Ok(truncated as i128)
}

fn is_decimal_digits(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

macro_rules! narrow_to {
    ($wide:expr, $text:expr, $kind:expr, $directive:expr, $mode:expr, $ty:ty, $variant:ident, $repr:ty) => {{
        let narrowed: $ty = match $mode {
            NumericMode::Truncate => $wide as $ty,
            NumericMode::Checked => {
                <$ty>::try_from($wide).map_err(|_| overflow($directive, $text, $kind))?
            }
        };
        Scalar::$variant(narrowed as $repr)
    }};
}

fn narrow(wide: i128, text: &str, kind: FieldKind, directive: &FieldDirective, mode: NumericMode) -> Result<Scalar> {
    Ok(match kind {
        FieldKind::I8 => narrow_to!(wide, text, kind, directive, mode, i8, Int, i64),
        FieldKind::I16 => narrow_to!(wide, text, kind, directive, mode, i16, Int, i64),
        FieldKind::I32 => narrow_to!(wide, text, kind, directive, mode, i32, Int, i64),
        FieldKind::I64 => narrow_to!(wide, text, kind, directive, mode, i64, Int, i64),
        FieldKind::Isize => narrow_to!(wide, text, kind, directive, mode, isize, Int, i64),
        FieldKind::U8 => narrow_to!(wide, text, kind, directive, mode, u8, Uint, u64),
        FieldKind::U16 => narrow_to!(wide, text, kind, directive, mode, u16, Uint, u64),
        FieldKind::U32 => narrow_to!(wide, text, kind, directive, mode, u32, Uint, u64),
        FieldKind::U64 => narrow_to!(wide, text, kind, directive, mode, u64, Uint, u64),
        FieldKind::Usize => narrow_to!(wide, text, kind, directive, mode, usize, Uint, u64),
        other => {
            return Err(Error::illegal_state(
                format!("{} is not an integer kind", other),
                Some(directive.ident.as_str()),
            ))
        }
    })
}

fn overflow(directive: &FieldDirective, text: &str, kind: FieldKind) -> Error {
    Error::NumericOverflow {
        field: directive.ident.clone(),
        value: text.to_string(),
        target: kind.to_string(),
    }
}

fn non_finite(directive: &FieldDirective, text: &str) -> Error {
    Error::illegal_state(
        format!("{:?} is not a finite number and cannot be written to JSON", text),
        Some(directive.ident.as_str()),
    )
}
