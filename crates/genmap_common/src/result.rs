//! Common result and error types for the genmap workspace.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a broken internal invariant (a bug in genmap), not a
/// user-facing error. Problems with user input (a malformed UCF, an
/// unsupported netlist) have their own error enums in the crates that detect
/// them.
pub type GenmapResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in genmap, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
