//! Conversion orchestrator
//!
//! [`Mapper`] drives the pipeline for whole records and sequences of
//! records. Marshal encodes a record with serde, reads every mapped field at
//! its declared name and rewrites it at its mapping path. Unmarshal reads
//! each mapped field at its mapping path, rewrites it at its declared name
//! and decodes the result with serde.
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use crate::config::MapperConfig;
use crate::document::{escape_key, value_type_name, Document};
use crate::error::{Error, Result};
use crate::mapping::{apply, directives, resolve, FieldDirective, Mapped, PendingChange, Resolution};
use serde_json::Value;
use tracing::{debug, debug_span};

/// Runs conversions under one configuration
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
}

/// Values that can be marshaled: records, sequences of records, and
/// optional forms of those
pub trait Source {
    /// Encode to a mapped JSON value
    fn encode_mapped(&self, mapper: &Mapper) -> Result<Value>;
}

/// Destinations that can be unmarshaled into
pub trait Target {
    /// Reject destinations that cannot receive a value, before any parsing
    fn check_target(&self) -> Result<()> {
        Ok(())
    }

    /// Decode a mapped document into `self`
    fn decode_mapped(&mut self, document: Document, mapper: &Mapper) -> Result<()>;
}

impl Mapper {
    /// Create a mapper with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper with a specific configuration
    pub fn with_config(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Encode a record or sequence of records into mapped JSON bytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the input is `None`, or a record that does not encode to a JSON object
    /// - a field annotation is malformed
    /// - a value cannot be coerced into its declared kind
    pub fn marshal<S: Source + ?Sized>(&self, source: &S) -> Result<Vec<u8>> {
        let value = source.encode_mapped(self)?;
        Ok(serde_json::to_vec(&value)?)
    }

    /// Decode mapped JSON bytes into a record or sequence of records
    ///
    /// Record targets are replaced only when decoding succeeds. The record is
    /// decoded whole from the rewritten document, so a field without a
    /// mapping does not keep the target's previous value: it must be present
    /// in `data` or carry `#[serde(default)]`. Sequence targets receive the
    /// decoded elements appended at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the target is `None`
    /// - `data` is not valid JSON, or a sequence target gets a non-array
    /// - a value cannot be coerced or decoded
    pub fn unmarshal<T: Target + ?Sized>(&self, data: &[u8], target: &mut T) -> Result<()> {
        target.check_target()?;
        let document = Document::from_slice(data)?;
        target.decode_mapped(document, self)
    }

    /// Marshal `source` and unmarshal the result into `target`
    pub fn convert<S, T>(&self, source: &S, target: &mut T) -> Result<()>
    where
        S: Source + ?Sized,
        T: Target + ?Sized,
    {
        target.check_target()?;
        let data = self.marshal(source)?;
        self.unmarshal(&data, target)
    }

    /// Marshal a single record into a mapped JSON value
    pub fn marshal_record<R: Mapped>(&self, record: &R) -> Result<Value> {
        let directives = self.directives_for::<R>()?;
        let span = debug_span!("marshal_record", record = std::any::type_name::<R>());
        let _guard = span.enter();

        let baseline = serde_json::to_value(record)?;
        if !baseline.is_object() {
            return Err(Error::illegal_argument(format!(
                "{} encodes to a JSON {}, expected an object",
                std::any::type_name::<R>(),
                value_type_name(&baseline)
            )));
        }
        let document = Document::from_value(baseline);

        // Omitted fields are cleared before any write lands
        let mut removals = Vec::new();
        let mut writes = Vec::with_capacity(directives.len());
        for directive in &directives {
            let name = escape_key(&directive.name);
            match resolve(&document, &name, directive, self.config.numeric)? {
                Resolution::Omit => {
                    removals.push(PendingChange::Delete { path: name });
                    removals.push(PendingChange::Delete {
                        path: directive.path.clone(),
                    });
                }
                Resolution::Unset => {}
                resolved => writes.extend(write_change(directive.path.clone(), resolved)),
            }
        }

        let mut changes = removals;
        changes.append(&mut writes);
        debug!(fields = directives.len(), changes = changes.len(), "marshaling record");
        Ok(apply(document, changes)?.into_value())
    }

    /// Unmarshal a single record out of a mapped document
    pub fn unmarshal_record<R: Mapped>(&self, document: Document) -> Result<R> {
        let directives = self.directives_for::<R>()?;
        let span = debug_span!("unmarshal_record", record = std::any::type_name::<R>());
        let _guard = span.enter();

        if !document.as_value().is_object() {
            return Err(Error::illegal_argument(format!(
                "cannot unmarshal a JSON {} into {}",
                value_type_name(document.as_value()),
                std::any::type_name::<R>()
            )));
        }

        let mut changes = Vec::with_capacity(directives.len());
        for directive in &directives {
            let resolved = resolve(&document, &directive.path, directive, self.config.numeric)?;
            changes.extend(write_change(escape_key(&directive.name), resolved));
        }

        debug!(fields = directives.len(), changes = changes.len(), "unmarshaling record");
        let document = apply(document, changes)?;
        Ok(serde_json::from_value(document.into_value())?)
    }

    fn directives_for<R: Mapped>(&self) -> Result<Vec<FieldDirective>> {
        directives(&R::field_table(), &self.config.tags)
    }
}

fn write_change(path: String, resolved: Resolution) -> Option<PendingChange> {
    match resolved {
        Resolution::Value(value) => Some(PendingChange::Set { path, value }),
        Resolution::Raw(raw) => Some(PendingChange::SetRaw { path, raw }),
        Resolution::Omit | Resolution::Unset => None,
    }
}

impl<R: Mapped> Source for R {
    fn encode_mapped(&self, mapper: &Mapper) -> Result<Value> {
        mapper.marshal_record(self)
    }
}

impl<R: Mapped> Source for [R] {
    fn encode_mapped(&self, mapper: &Mapper) -> Result<Value> {
        debug!(elements = self.len(), "marshaling sequence");
        let items = self
            .iter()
            .map(|item| mapper.marshal_record(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }
}

impl<R: Mapped> Source for Vec<R> {
    fn encode_mapped(&self, mapper: &Mapper) -> Result<Value> {
        self.as_slice().encode_mapped(mapper)
    }
}

impl<S: Source> Source for Option<S> {
    fn encode_mapped(&self, mapper: &Mapper) -> Result<Value> {
        match self {
            Some(inner) => inner.encode_mapped(mapper),
            None => Err(Error::illegal_argument("cannot marshal a null value")),
        }
    }
}

impl<R: Mapped> Target for R {
    fn decode_mapped(&mut self, document: Document, mapper: &Mapper) -> Result<()> {
        *self = mapper.unmarshal_record(document)?;
        Ok(())
    }
}

impl<R: Mapped> Target for Vec<R> {
    fn decode_mapped(&mut self, document: Document, mapper: &Mapper) -> Result<()> {
        let Value::Array(items) = document.into_value() else {
            return Err(Error::illegal_argument(
                "a sequence target requires a JSON array",
            ));
        };
        debug!(elements = items.len(), "unmarshaling sequence");

        let decoded = items
            .into_iter()
            .map(|item| mapper.unmarshal_record(Document::from_value(item)))
            .collect::<Result<Vec<R>>>()?;
        self.extend(decoded);
        Ok(())
    }
}

impl<T: Target> Target for Option<T> {
    fn check_target(&self) -> Result<()> {
        match self {
            Some(inner) => inner.check_target(),
            None => Err(Error::illegal_argument("cannot unmarshal into a null target")),
        }
    }

    fn decode_mapped(&mut self, document: Document, mapper: &Mapper) -> Result<()> {
        match self {
            Some(inner) => inner.decode_mapped(document, mapper),
            None => Err(Error::illegal_argument("cannot unmarshal into a null target")),
        }
    }
}

/// Marshal with the default configuration
pub fn marshal<S: Source + ?Sized>(source: &S) -> Result<Vec<u8>> {
    Mapper::default().marshal(source)
}

/// Unmarshal with the default configuration
pub fn unmarshal<T: Target + ?Sized>(data: &[u8], target: &mut T) -> Result<()> {
    Mapper::default().unmarshal(data, target)
}

/// Convert between two mapped types with the default configuration
pub fn convert<S, T>(source: &S, target: &mut T) -> Result<()>
where
    S: Source + ?Sized,
    T: Target + ?Sized,
{
    Mapper::default().convert(source, target)
}
