//! Error types for firmgate core values

use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while decoding or encoding core values
///
/// The carrier and descriptor types never fail for data they merely hold;
/// these errors only come out of the wire codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A file resource named no lookup field
    #[error("File resource must name one of sha1, filename or artifactId")]
    EmptyFileResource,

    /// A file resource named more than one lookup field
    #[error("File resource names {0} lookup fields, expected exactly one")]
    AmbiguousFileResource(usize),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
