//! Declared field kinds
//!
//! A field's kind decides how a resolved document value is coerced before
//! it is written back. Kinds can be spelled out with [`FieldKind`] or
//! derived from the Rust type through [`Kinded`].
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use super::Mapped;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// Primitive or composite kind of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    /// Nested record
    Record,
    /// Key/value mapping
    Map,
    /// Sequence or array
    Seq,
    /// Anything else; coerced through its string form
    Other,
}

/// A field kind plus whether the field may hold `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldKind {
    /// The nullable form of this kind, as for an `Option<T>` field
    pub const fn optional(self) -> FieldType {
        FieldType {
            kind: self,
            nullable: true,
        }
    }

    /// Whether values of this kind are spliced as raw sub-documents
    pub fn is_composite(self) -> bool {
        matches!(self, FieldKind::Record | FieldKind::Map | FieldKind::Seq)
    }

    /// Whether this is one of the integer kinds
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldKind::I8
                | FieldKind::I16
                | FieldKind::I32
                | FieldKind::I64
                | FieldKind::Isize
                | FieldKind::U8
                | FieldKind::U16
                | FieldKind::U32
                | FieldKind::U64
                | FieldKind::Usize
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::Isize => "isize",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::Usize => "usize",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Record => "record",
            FieldKind::Map => "map",
            FieldKind::Seq => "sequence",
            FieldKind::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<FieldKind> for FieldType {
    fn from(kind: FieldKind) -> Self {
        FieldType {
            kind,
            nullable: false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "optional {}", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Rust types whose field kind is known statically
pub trait Kinded {
    const FIELD_TYPE: FieldType;
}

macro_rules! impl_kinded {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Kinded for $ty {
                const FIELD_TYPE: FieldType = FieldType {
                    kind: FieldKind::$kind,
                    nullable: false,
                };
            }
        )*
    };
}

impl_kinded! {
    bool => Bool,
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Other,
}

impl<T: Mapped> Kinded for T {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Record,
        nullable: false,
    };
}

impl<T: Kinded> Kinded for Option<T> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: T::FIELD_TYPE.kind,
        nullable: true,
    };
}

impl<T> Kinded for Vec<T> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Seq,
        nullable: false,
    };
}

impl<T> Kinded for VecDeque<T> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Seq,
        nullable: false,
    };
}

impl<T, const N: usize> Kinded for [T; N] {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Seq,
        nullable: false,
    };
}

impl<T> Kinded for BTreeSet<T> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Seq,
        nullable: false,
    };
}

impl<T, S> Kinded for HashSet<T, S> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Seq,
        nullable: false,
    };
}

impl<K, V> Kinded for BTreeMap<K, V> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Map,
        nullable: false,
    };
}

impl<K, V, S> Kinded for HashMap<K, V, S> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: FieldKind::Map,
        nullable: false,
    };
}
