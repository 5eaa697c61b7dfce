#![deny(missing_docs)]

//! # Error Handling
//!
//! Centralized error types for the model builder and emitter.
//!
//! Only `SpecValidation` aborts a whole run. Reference failures are caught at the
//! schema/operation builder boundary and degraded to `Any` with a warning.

use derive_more::{Display, From};

/// The main error type for the library.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Errors originating from filesystem operations.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed top-level document (missing sections, wrong version).
    #[from(ignore)]
    #[display("Spec Validation Error: {_0}")]
    SpecValidation(String),

    /// A `$ref` that is not a same-document `#/...` pointer.
    #[from(ignore)]
    #[display("Unsupported Reference: {_0}")]
    UnsupportedReference(String),

    /// A `$ref` pointer that cannot be followed to a node.
    #[from(ignore)]
    #[display("Reference Not Found: {_0}")]
    ReferenceNotFound(String),

    /// General catch-all error.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for AppError {}

/// A specialized Result type for library operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Returns true for errors that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::SpecValidation(_) | AppError::Io(_))
    }
}
