//! Repeating-key XOR stream transform with Base64 framing
//!
//! Each byte of the plaintext at 1-based position `i` is XORed with the
//! key byte at index `i % key_len`, and the raw result is Base64-encoded
//! with the standard alphabet. The transform is symmetric and carries no
//! authentication; integrity is layered on by the statement signer.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// Apply the position-indexed XOR to a byte sequence
///
/// Precondition: `key` is non-empty. Session keys are fixed-length hash
/// digests, so this holds for every caller in the crate.
fn xor_stream(data: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(!key.is_empty(), "cipher key must be non-empty");
    data.iter()
        .enumerate()
        .map(|(pos, byte)| byte ^ key[(pos + 1) % key.len()])
        .collect()
}

/// Encrypt a single token, producing Base64 ciphertext
pub fn encrypt_token(plain: &str, key: &str) -> String {
    STANDARD.encode(xor_stream(plain.as_bytes(), key.as_bytes()))
}

/// Decrypt a single Base64 ciphertext token
///
/// Fails with [`Error::Base64`] on malformed framing and with
/// [`Error::Cipher`] when the XOR output is not valid UTF-8, which is
/// the usual outcome of decrypting with the wrong key.
pub fn decrypt_token(cipher_b64: &str, key: &str) -> Result<String> {
    let raw = STANDARD.decode(cipher_b64)?;
    String::from_utf8(xor_stream(&raw, key.as_bytes()))
        .map_err(|e| Error::Cipher(format!("decrypted token is not valid UTF-8: {}", e)))
}
