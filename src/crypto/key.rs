//! Session key derivation
//!
//! A session key is derived once per engine instance from the
//! connection string, the wall clock, and two independent random draws.
//! It is immutable for the engine's lifetime and never persisted.

use chrono::Utc;
use rand::Rng;

use crate::crypto::digest_hex;

/// Per-engine secret used for all cipher and signing operations
///
/// Derivation: `seed = SHA-256(connection_string || timestamp || nonce)`,
/// `key = SHA-256(seed || salt)`, both rendered as hex. The key is
/// therefore always 64 printable characters, which satisfies the stream
/// cipher's non-empty-key precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    /// Intermediate seed, retained for diagnostics
    seed: String,

    /// Key material fed to the cipher and signer
    key: String,
}

impl SessionKey {
    /// Derive a fresh key from the connection string, the current wall
    /// clock, and the thread-local random source
    ///
    /// Never fails. Two keys derived in separate calls differ with
    /// overwhelming probability.
    pub fn derive(connection_string: &str) -> Self {
        let mut rng = rand::thread_rng();
        Self::derive_at(
            connection_string,
            Utc::now().timestamp_millis(),
            rng.gen::<u64>(),
            rng.gen::<u64>(),
        )
    }

    /// Derive a key from explicit clock and random inputs
    ///
    /// Deterministic; used by [`SessionKey::derive`] and by tests that
    /// need reproducible key material.
    pub fn derive_at(
        connection_string: &str,
        timestamp_millis: i64,
        nonce: u64,
        salt: u64,
    ) -> Self {
        let seed = digest_hex(&format!("{}{}{}", connection_string, timestamp_millis, nonce));
        let key = digest_hex(&format!("{}{}", seed, salt));
        SessionKey { seed, key }
    }

    /// The intermediate seed digest
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The key material used for XOR and signing
    pub fn material(&self) -> &str {
        &self.key
    }
}
