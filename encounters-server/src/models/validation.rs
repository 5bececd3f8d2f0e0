//! Validation error types

use std::fmt;

/// Validation error for request payloads and stored values
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field was absent
    Missing { field: &'static str },

    /// String doesn't match the required format (e.g., identifier)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Numeric constant outside the known enum range
    InvalidVariant { field: &'static str, value: String },

    /// Request body could not be decoded
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::MalformedBody { reason } => write!(f, "malformed JSON body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
