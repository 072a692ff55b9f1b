//! Error taxonomy shared by every construction-side operation.
//!
//! Conversion, builder and parser calls fail synchronously with one of these
//! variants. Flattening/rendering never fails, and result coercion
//! ([`crate::coerce`]) never produces an error at all.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed reference, invalid identifier, non-finite number, or a
    /// non-integer passed where an integer is required.
    #[error("invalid value `{value}`: {rule}")]
    Validation { value: String, rule: String },

    /// Input with no canonical rendering (empty array or empty record).
    #[error("ambiguous input: empty {kind} has no canonical term form")]
    AmbiguousInput { kind: &'static str },

    /// Null in strict mode.
    #[error("null value in strict mode; wrap the pattern in OPTIONAL instead of binding null")]
    NullValue,

    /// Malformed node description or arrow pattern.
    #[error("parse error at offset {offset} in `{input}`: {message}")]
    Parse {
        input: String,
        offset: usize,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(value: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::Validation {
            value: value.into(),
            rule: rule.into(),
        }
    }

    pub fn parse(input: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            offset,
            message: message.into(),
        }
    }
}
