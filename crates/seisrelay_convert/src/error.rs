//! Error types for classification and conversion.

use thiserror::Error;

/// Errors raised while converting a bulletin into a sink payload.
///
/// Validation warnings are fatal for the affected event just like validation
/// errors: a bulletin that fails either check is dropped, never published.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converted record failed semantic validation.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The converted record raised a validation warning (still fatal for the event).
    #[error("validation warning: {message}")]
    ValidationWarning { message: String },

    /// The bulletin bytes could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// No converter exists for an unrecognized bulletin name.
    #[error("no converter for unrecognized bulletin")]
    Unrecognized,

    /// The record could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn validation(message: impl Into<String>) -> Self {
        ConvertError::Validation {
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        ConvertError::ValidationWarning {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ConvertError::Parse {
            message: message.into(),
        }
    }

    /// Check if this error came from the validation pass.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConvertError::Validation { .. } | ConvertError::ValidationWarning { .. }
        )
    }
}
