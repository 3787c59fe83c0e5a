//! Error types for form generation and store access.

use thiserror::Error;

/// Everything that can go wrong between a render pass and the remote store.
///
/// Connection failures abort the current pass; every other variant is
/// recovered in place and surfaced to the user as readable text. Nothing is
/// retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Connection failed: {reason}")]
    Connection { reason: String },

    #[error("Could not infer columns for {table}: {reason}")]
    SchemaInference { table: String, reason: String },

    #[error("Could not load records from {table}: {reason}")]
    Fetch { table: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Insert into {table} failed: {reason}")]
    Insert { table: String, reason: String },

    #[error("Invalid configuration for {field}: {reason}")]
    Config { field: String, reason: String },
}

impl FormError {
    /// Connection failures halt the render pass; the rest render as
    /// notices and the pass carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FormError::Connection { .. })
    }
}

/// Result type alias for form operations.
pub type FormResult<T> = Result<T, FormError>;
