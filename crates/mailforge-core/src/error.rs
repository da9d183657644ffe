//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected by validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Keyed store rejected the operation.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error for values parsed from external input.
///
/// Mutation and rendering APIs never surface these; they fall back to a
/// documented default instead. Only explicit parsers return them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Element type name is not one of the known types.
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),

    /// Schedule preset is not recognised.
    #[error("Unknown schedule preset: {0}")]
    UnknownSchedulePreset(String),

    /// Embed kind is not recognised.
    #[error("Unknown embed kind: {0}")]
    UnknownEmbedKind(String),

    /// Template name is empty or reserved.
    #[error("Invalid template name: {0:?}")]
    InvalidTemplateName(String),
}

impl ValidationError {
    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::UnknownElementType(_) => "type",
            Self::UnknownSchedulePreset(_) => "schedule",
            Self::UnknownEmbedKind(_) => "embedType",
            Self::InvalidTemplateName(_) => "name",
        }
    }
}
