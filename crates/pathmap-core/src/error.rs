//! Error types for the pathmap core library
//!
//! This module defines the error handling system for the mapping engine,
//! using thiserror for ergonomic error definitions and anyhow as the boxed
//! source for configuration failures.

use crate::document::PathError;
use thiserror::Error;

/// Main error type for pathmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input that is neither a record nor a sequence of records, or a null target
    #[error("Illegal argument: {message}")]
    IllegalArgument { message: String },

    /// The engine reached a state it has no rule for
    #[error("Illegal state: {message}")]
    IllegalState {
        message: String,
        field: Option<String>,
    },

    /// Boolean or numeric text that could not be parsed into the field's kind
    #[error("Parse error for field '{field}': cannot read {value:?} as {expected}")]
    Parse {
        field: String,
        value: String,
        expected: String,
    },

    /// Checked narrowing rejected a value outside the destination width
    #[error("Numeric overflow for field '{field}': {value} does not fit in {target}")]
    NumericOverflow {
        field: String,
        value: String,
        target: String,
    },

    /// Malformed field annotation
    #[error("Annotation error on field '{field}': {message}")]
    Annotation { field: String, message: String },

    /// Path syntax or document mutation errors
    #[error("Path error: {source}")]
    Path {
        #[from]
        source: PathError,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an illegal argument error
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument {
            message: message.into(),
        }
    }

    /// Create an illegal state error, optionally attributed to a field
    pub fn illegal_state(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::IllegalState {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// Create a parse error for a field
    pub fn parse(field: impl Into<String>, value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Whether this error was caused by the caller's arguments rather than data
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, Self::IllegalArgument { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::illegal_argument("cannot unmarshal into a null target");
        assert_eq!(
            err.to_string(),
            "Illegal argument: cannot unmarshal into a null target"
        );
        assert!(err.is_illegal_argument());
    }

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse("a_bool", "maybe", "bool");
        assert_eq!(
            err.to_string(),
            "Parse error for field 'a_bool': cannot read \"maybe\" as bool"
        );
        assert!(!err.is_illegal_argument());
    }

    #[test]
    fn test_path_error_conversion() {
        let err: Error = PathError::empty_path().into();
        assert!(matches!(err, Error::Path { .. }));
        assert!(err.to_string().starts_with("Path error:"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json { .. }));
    }
}
