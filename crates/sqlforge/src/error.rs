//! Error types for sqlforge

use thiserror::Error;

/// Result type alias for sqlforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Error types for statement assembly and execution
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Rendering was requested before the statement was assembled
    #[error("statement not assembled: call assemble() before rendering")]
    NotAssembled,

    /// An identity-based operation was attempted on a record without a usable
    /// identity column/value pair
    #[error("entity has no usable identity column")]
    MissingId,

    /// An execution convenience was invoked without an adapter bound
    #[error("no execution adapter configured")]
    AdapterNotSet,

    /// Downstream adapter error (connectivity, constraint violations, ...),
    /// passed through unmodified
    #[error("adapter error: {0}")]
    Adapter(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Row not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl ForgeError {
    /// Wrap a driver error for passthrough.
    pub fn adapter<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Adapter(Box::new(err))
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is the not-assembled error
    pub fn is_not_assembled(&self) -> bool {
        matches!(self, Self::NotAssembled)
    }
}
