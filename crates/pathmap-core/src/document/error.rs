//! Error types for document path operations
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while parsing a document path or applying it to a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Parse errors during path parsing
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// An empty path was given where a location is required
    #[error("Empty path")]
    EmptyPath,

    /// A path feature that the operation cannot honor
    #[error("Unsupported in {operation}: {feature} (path: {path})")]
    Unsupported {
        feature: String,
        operation: String,
        path: String,
    },

    /// The document shape does not admit the requested write
    #[error("Type mismatch: expected {expected}, found {found} at {path}")]
    TypeMismatch {
        expected: String,
        found: String,
        path: String,
    },
}

impl PathError {
    /// Create a parse error with position and input
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create an empty path error
    pub fn empty_path() -> Self {
        Self::EmptyPath
    }

    /// Create an unsupported feature error
    pub fn unsupported(
        feature: impl Into<String>,
        operation: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            operation: operation.into(),
            path: path.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            path: path.into(),
        }
    }

    /// Get the error message with a caret under the failing position
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Parse { message, position, input } => {
                let mut result = format!("Parse error at position {}: {}", position, message);
                if !input.is_empty() {
                    result.push_str(&format!("\nInput: {}", input));
                    if *position <= input.len() {
                        result.push_str(&format!("\n       {}^", " ".repeat(*position)));
                    }
                }
                result
            }
            other => other.to_string(),
        }
    }
}

/// Name of a JSON value's type, used in error messages
pub fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detailed_message_points_at_position() {
        let err = PathError::parse("Empty path component", 2, "a..b");
        let message = err.detailed_message();
        assert!(message.contains("Input: a..b"));
        assert!(message.ends_with("  ^"));
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!([1])), "array");
        assert_eq!(value_type_name(&json!({"a": 1})), "object");
        assert_eq!(value_type_name(&json!("x")), "string");
    }
}
