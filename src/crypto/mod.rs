//! Cryptographic primitives for the obfuscation pipeline
//!
//! This module provides the SHA-256 digest helper used throughout the
//! crate and the statement signer that appends/verifies a hash over
//! ciphertext.

pub mod cipher;
pub mod key;

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a string and render it as lowercase hex
///
/// # Arguments
///
/// * `data` - Data to hash
///
/// # Returns
///
/// A 64-character lowercase hex string
pub fn digest_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Sign a ciphertext body with the session key
///
/// The signature is `SHA-256(body || key)` rendered as hex. It covers
/// the entire body string concatenated with the key, so any change to
/// either invalidates it.
pub fn sign(body: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a signature against a ciphertext body and key
///
/// Plain string comparison, not constant time.
pub fn verify(body: &str, signature: &str, key: &str) -> bool {
    sign(body, key) == signature
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex() {
        let hash = digest_hex("test data");

        // Deterministic and 64 hex chars
        assert_eq!(hash, digest_hex("test data"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));

        // Different data should produce a different digest
        assert_ne!(hash, digest_hex("other data"));

        // Known SHA-256 vector
        assert_eq!(
            digest_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sign_covers_body_and_key() {
        let sig = sign("body", "key");

        assert_eq!(sig, sign("body", "key"));
        assert_ne!(sig, sign("body2", "key"));
        assert_ne!(sig, sign("body", "key2"));

        // Signing is plain concatenation of body and key
        assert_eq!(sig, digest_hex("bodykey"));
    }

    #[test]
    fn test_verify() {
        let sig = sign("ciphertext", "sessionkey");

        assert!(verify("ciphertext", &sig, "sessionkey"));
        assert!(!verify("ciphertext2", &sig, "sessionkey"));
        assert!(!verify("ciphertext", &sig, "otherkey"));
        assert!(!verify("ciphertext", "bogus", "sessionkey"));
    }
}
