#![forbid(unsafe_code)]

//! Ready-made value converters for common view/model mismatches.
//!
//! Converters are plain functions `Value -> Result<Value, ConvertError>` so
//! they can be passed straight to [`Property::read`](crate::Property::read)
//! and [`Property::show`](crate::Property::show). They are assumed pure;
//! a failing converter aborts the surrounding `get`/`set` (errors are never
//! swallowed).

use std::fmt;

use stitch_core::value::Value;

/// A converter rejected its input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    /// Build an error from a human-readable reason.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversion failed: {}", self.message)
    }
}

impl std::error::Error for ConvertError {}

/// Show converter: render any value as text.
pub fn to_text(value: Value) -> Result<Value, ConvertError> {
    Ok(Value::Text(value.to_text()))
}

/// Read converter: parse text into an integer, trimming surrounding
/// whitespace. Integers pass through unchanged.
pub fn parse_int(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::Int(i) => Ok(Value::Int(i)),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|err| ConvertError::new(format!("'{s}' is not an integer: {err}"))),
        other => Err(ConvertError::new(format!(
            "expected text or integer, got {other:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
