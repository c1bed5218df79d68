//! Connection vault
//!
//! Maps a logical connection name to a live driver handle and to an
//! encrypted copy of its connection string. The encrypted copy uses a
//! key derived solely from the current calendar date, independent of any
//! per-statement session key: entries encrypted on the same date share
//! key material, and a stale key cannot decrypt them. The date is
//! guessable, so this layer obscures rather than secures.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use log::{debug, info};

use crate::crypto::{cipher, digest_hex};
use crate::error::{Error, Result};

/// Fixed prefix mixed into the date-scoped key
const DATE_KEY_PREFIX: &str = "SecureSQL";

/// External collaborator that opens live connections
///
/// The vault hands it the **plain** connection string; the stored live
/// handle is never built from the encrypted copy.
pub trait ConnectionOpener {
    /// Live connection handle type
    type Connection;

    /// Driver error type
    type Error: std::fmt::Display;

    /// Open a connection from a plain connection string
    fn open(&self, connection_string: &str)
        -> std::result::Result<Self::Connection, Self::Error>;
}

/// Derive the key for a calendar date: `SHA-256("SecureSQL" || YYYYMMDD)`
pub fn date_key(date: NaiveDate) -> String {
    digest_hex(&format!("{}{}", DATE_KEY_PREFIX, date.format("%Y%m%d")))
}

/// Encrypt a connection string under a specific date's key
///
/// Same XOR-plus-Base64 transform as statement tokens; no signature is
/// appended.
pub fn encrypt_for_date(connection_string: &str, date: NaiveDate) -> String {
    cipher::encrypt_token(connection_string, &date_key(date))
}

/// Decrypt a connection string under a specific date's key
pub fn decrypt_for_date(encrypted: &str, date: NaiveDate) -> Result<String> {
    cipher::decrypt_token(encrypted, &date_key(date))
}

/// Encrypt a connection string under today's key
pub fn encrypt_connection_string(connection_string: &str) -> String {
    encrypt_for_date(connection_string, Local::now().date_naive())
}

/// Decrypt a connection string under today's key
///
/// Only succeeds when invoked on the calendar date the string was
/// encrypted; with a stale key the XOR output is garbage and usually
/// fails UTF-8 validation.
pub fn decrypt_connection_string(encrypted: &str) -> Result<String> {
    decrypt_for_date(encrypted, Local::now().date_naive())
}

/// Registry of named connections with encrypted connection strings
#[derive(Debug)]
pub struct ConnectionVault<O: ConnectionOpener> {
    opener: O,
    live: BTreeMap<String, O::Connection>,
    encrypted: BTreeMap<String, String>,
}

impl<O: ConnectionOpener> ConnectionVault<O> {
    /// Create a vault over the given opener
    pub fn new(opener: O) -> Self {
        ConnectionVault {
            opener,
            live: BTreeMap::new(),
            encrypted: BTreeMap::new(),
        }
    }

    /// Add a named connection
    ///
    /// Encrypts the connection string under today's key and opens a live
    /// handle from the plain string; both are stored under `name`,
    /// replacing any previous entry. Opener failures are wrapped as
    /// [`Error::Connection`].
    pub fn add_connection(&mut self, name: &str, connection_string: &str) -> Result<()> {
        let encrypted = encrypt_connection_string(connection_string);
        let connection = self
            .opener
            .open(connection_string)
            .map_err(|e| Error::Connection(e.to_string()))?;

        self.live.insert(name.to_string(), connection);
        self.encrypted.insert(name.to_string(), encrypted);
        info!("connection {} added to vault", name);
        Ok(())
    }

    /// Look up a live connection by name
    pub fn get_connection(&self, name: &str) -> Option<&O::Connection> {
        self.live.get(name)
    }

    /// Mutable lookup of a live connection by name
    pub fn get_connection_mut(&mut self, name: &str) -> Option<&mut O::Connection> {
        self.live.get_mut(name)
    }

    /// The stored encrypted connection string, if the name is known
    pub fn encrypted_connection_string(&self, name: &str) -> Option<&str> {
        self.encrypted.get(name).map(String::as_str)
    }

    /// Decrypt the stored connection string for a name
    ///
    /// `Ok(None)` when the name is unknown. Re-derives today's key, so
    /// this only succeeds on the same calendar date the entry was added.
    pub fn decrypt_connection_string(&self, name: &str) -> Result<Option<String>> {
        match self.encrypted.get(name) {
            Some(encrypted) => decrypt_connection_string(encrypted).map(Some),
            None => Ok(None),
        }
    }

    /// Remove a named connection, releasing its live handle
    ///
    /// Returns whether an entry existed.
    pub fn remove_connection(&mut self, name: &str) -> bool {
        let existed = self.live.remove(name).is_some();
        self.encrypted.remove(name);
        if existed {
            info!("connection {} removed from vault", name);
        } else {
            debug!("connection {} not present in vault", name);
        }
        existed
    }

    /// Number of live connections held
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the vault holds no connections
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Opener yielding plain handles, with a failure switch
    struct FakeOpener {
        fail: bool,
        opened: Cell<usize>,
    }

    impl FakeOpener {
        fn new() -> Self {
            FakeOpener {
                fail: false,
                opened: Cell::new(0),
            }
        }
    }

    struct FakeConnection {
        dsn: String,
    }

    impl ConnectionOpener for FakeOpener {
        type Connection = FakeConnection;
        type Error = String;

        fn open(&self, connection_string: &str) -> std::result::Result<FakeConnection, String> {
            if self.fail {
                return Err("login timeout".to_string());
            }
            self.opened.set(self.opened.get() + 1);
            Ok(FakeConnection {
                dsn: connection_string.to_string(),
            })
        }
    }

    const DSN: &str = "Driver=Test;Server=local;Database=Northwind;Uid=sa;Pwd=secret";

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_same_date_round_trip() {
        let encrypted = encrypt_for_date(DSN, march(15));
        assert_eq!(decrypt_for_date(&encrypted, march(15)).unwrap(), DSN);
    }

    #[test]
    fn test_cross_date_decryption_fails() {
        let encrypted = encrypt_for_date(DSN, march(15));
        match decrypt_for_date(&encrypted, march(16)) {
            // Wrong key: garbage bytes that fail UTF-8 validation, or in
            // rare cases a decode that is merely not the original.
            Err(Error::Cipher(_)) | Err(Error::Base64(_)) => {}
            Ok(decrypted) => assert_ne!(decrypted, DSN),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_same_date_entries_share_key_material() {
        assert_eq!(date_key(march(15)), date_key(march(15)));
        assert_ne!(date_key(march(15)), date_key(march(16)));
    }

    #[test]
    fn test_encrypted_form_has_no_signature() {
        let encrypted = encrypt_for_date(DSN, march(15));
        assert!(!encrypted.contains('|'));
    }

    #[test]
    fn test_date_key_is_independent_of_session_keys() {
        // Derived only from the fixed prefix and the calendar date
        assert_eq!(
            date_key(march(15)),
            digest_hex("SecureSQL20240315")
        );
    }

    #[test]
    fn test_add_and_get_connection() {
        let mut vault = ConnectionVault::new(FakeOpener::new());
        vault.add_connection("main", DSN).unwrap();

        // Live handle built from the plain connection string
        assert_eq!(vault.get_connection("main").unwrap().dsn, DSN);
        assert!(vault.get_connection("other").is_none());
        assert_eq!(vault.len(), 1);

        // Stored encrypted copy decrypts back today
        assert_eq!(
            vault.decrypt_connection_string("main").unwrap().unwrap(),
            DSN
        );
        assert!(vault.decrypt_connection_string("other").unwrap().is_none());

        // Encrypted copy is not the plain string
        assert_ne!(vault.encrypted_connection_string("main").unwrap(), DSN);

        // Exactly one live handle was opened
        assert_eq!(vault.opener.opened.get(), 1);
    }

    #[test]
    fn test_remove_connection_drops_both_entries() {
        let mut vault = ConnectionVault::new(FakeOpener::new());
        vault.add_connection("main", DSN).unwrap();

        assert!(vault.remove_connection("main"));
        assert!(vault.get_connection("main").is_none());
        assert!(vault.encrypted_connection_string("main").is_none());
        assert!(vault.is_empty());

        assert!(!vault.remove_connection("main"));
    }

    #[test]
    fn test_opener_failure_is_wrapped_and_nothing_is_stored() {
        let mut opener = FakeOpener::new();
        opener.fail = true;
        let mut vault = ConnectionVault::new(opener);

        match vault.add_connection("main", DSN) {
            Err(Error::Connection(msg)) => assert_eq!(msg, "login timeout"),
            other => panic!("Expected Connection error, got {:?}", other),
        }
        assert!(vault.get_connection("main").is_none());
        assert!(vault.encrypted_connection_string("main").is_none());
    }
}
