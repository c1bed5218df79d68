//! Error types for the crate
//!
//! This module provides a consolidated error type covering the
//! obfuscation pipeline, the connection vault, and the external
//! execution collaborator.

use thiserror::Error;

/// Result type for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Consolidated error type
///
/// Absent lookups (parameter by name, connection by name) are not
/// errors; they are reported as `Option::None` by the respective APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// Obfuscated text is missing the signature separator
    #[error("Malformed obfuscated statement: {0}")]
    Format(String),

    /// Signature does not match the recomputed hash
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// Stream transform could not be inverted
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// Connection opener failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// External driver failed during execute/open
    #[error("Execution error: {0}")]
    Execution(String),

    /// Statement is not in a usable state
    #[error("Statement error: {0}")]
    Statement(String),

    /// Base64 decoding error
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Convert a displayable error to an execution error
pub fn to_execution_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Execution(err.to_string())
}
