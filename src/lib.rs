//! # sqlveil
//!
//! In-memory obfuscation for SQL statements, bound parameters, and
//! connection strings, with hash-based tamper detection before a
//! deobfuscated statement is allowed to execute.
//!
//! The pipeline replaces a fixed set of SQL keywords with bracketed
//! markers, encrypts every other token with a repeating-key XOR stream
//! framed in Base64, and appends a SHA-256 signature over the result.
//! Database drivers are reached only through the [`StatementExecutor`]
//! and [`ConnectionOpener`] traits; this crate never issues SQL itself.
//!
//! This is an obfuscation layer, not an authenticated cipher: it keeps
//! statements unreadable at rest in process memory and detects tampering,
//! nothing more.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod crypto;
pub mod error;
pub mod models;
pub mod obfuscation;
pub mod statement;
pub mod vault;

pub use crypto::key::SessionKey;
pub use error::{Error, Result};
pub use models::{Parameter, ParameterSet, ParameterType, ParameterValue};
pub use obfuscation::ObfuscationEngine;
pub use statement::{SecureStatement, StatementExecutor};
pub use vault::{ConnectionOpener, ConnectionVault};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscate_via_reexports() {
        let engine = ObfuscationEngine::new("Driver=Test;Server=local");
        let obfuscated = engine.obfuscate("SELECT 1");
        let plain = engine.deobfuscate(&obfuscated).unwrap();
        assert_eq!(plain, "SELECT 1");
    }
}
