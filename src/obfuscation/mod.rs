//! Statement obfuscation engine
//!
//! Composes the tokenizer, the XOR stream cipher, and the statement
//! signer into `obfuscate`/`deobfuscate` over a whole SQL statement.
//!
//! Wire format: `<space-joined markers and Base64 tokens> "|" <hex
//! signature>`. Markers and standard Base64 never contain `|`, so the
//! last `|` in the string always separates body from signature.

pub mod tokenizer;

use log::{debug, warn};

use crate::crypto::{self, cipher, key::SessionKey};
use crate::error::{Error, Result};

/// Obfuscates and deobfuscates SQL statements with a session-scoped key
///
/// The key is derived once at construction and is immutable for the
/// engine's lifetime. The engine holds no other state; `obfuscate` and
/// `deobfuscate` are pure with respect to it, so concurrent reads are
/// safe while callers serialize everything else.
#[derive(Debug, Clone)]
pub struct ObfuscationEngine {
    key: SessionKey,
}

impl ObfuscationEngine {
    /// Create an engine with a fresh session key derived from the
    /// connection string, the wall clock, and the random source
    pub fn new(connection_string: &str) -> Self {
        ObfuscationEngine {
            key: SessionKey::derive(connection_string),
        }
    }

    /// Create an engine over existing key material
    pub fn with_key(key: SessionKey) -> Self {
        ObfuscationEngine { key }
    }

    /// The engine's session key
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Obfuscate a SQL statement
    ///
    /// Keywords become markers and pass through untouched; every other
    /// space-separated piece is encrypted. The signature over the joined
    /// body and the session key is appended after a `|`.
    pub fn obfuscate(&self, sql: &str) -> String {
        let key = self.key.material();
        let tokenized = tokenizer::tokenize(sql);

        let body = tokenized
            .split(' ')
            .map(|piece| {
                if tokenizer::is_marker(piece) {
                    piece.to_string()
                } else {
                    cipher::encrypt_token(piece, key)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let signature = crypto::sign(&body, key);
        debug!("obfuscated statement into {} pieces", body.split(' ').count());
        format!("{}|{}", body, signature)
    }

    /// Verify and reverse an obfuscated statement back to plain SQL
    ///
    /// Fails with [`Error::Format`] when no signature separator is
    /// present and with [`Error::Integrity`] when the signature does not
    /// match; the plain SQL is never produced in either case. Keyword
    /// casing comes back canonical uppercase.
    pub fn deobfuscate(&self, obfuscated: &str) -> Result<String> {
        let key = self.key.material();

        let separator = match obfuscated.rfind('|') {
            Some(0) | None => {
                return Err(Error::Format(
                    "obfuscated statement has no signature separator".to_string(),
                ))
            }
            Some(pos) => pos,
        };
        let body = &obfuscated[..separator];
        let signature = &obfuscated[separator + 1..];

        if !crypto::verify(body, signature, key) {
            warn!("statement signature mismatch, refusing to deobfuscate");
            return Err(Error::Integrity(
                "statement signature does not match its body".to_string(),
            ));
        }

        let pieces = body
            .split(' ')
            .map(|piece| match tokenizer::marker_to_keyword(piece) {
                Some(keyword) => Ok(keyword.to_string()),
                None => cipher::decrypt_token(piece, key),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(pieces.join(" "))
    }
}
