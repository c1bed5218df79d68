//! Statement parameter representation
//!
//! Parameters are named, typed values kept alongside an obfuscated
//! statement. Names are case-insensitive; adding a parameter under an
//! existing name replaces the prior entry. Each parameter can produce a
//! one-way encrypted display rendering for logs and diagnostics.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::crypto::digest_hex;

/// Textual format used when rendering date/time values
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder rendered for binary payloads, whose encoding is out of
/// scope for the display form
const BINARY_PLACEHOLDER: &str = "[BINARY]";

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    /// Text string
    Text,

    /// Integer (64-bit)
    Integer,

    /// Floating point (64-bit)
    Float,

    /// Date and time, no timezone
    DateTime,

    /// Boolean
    Boolean,

    /// Binary data
    Binary,
}

/// Value of a parameter
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// Text string
    Text(String),

    /// Integer (64-bit)
    Integer(i64),

    /// Floating point (64-bit)
    Float(f64),

    /// Date and time, no timezone
    DateTime(NaiveDateTime),

    /// Boolean
    Boolean(bool),

    /// Binary data
    Binary(Vec<u8>),
}

impl Debug for ParameterValue {
    // Truncates payloads so plain values do not leak whole into logs
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ParameterValue::Text(v) => {
                // Truncate on a char boundary; byte slicing would panic
                // on multi-byte text.
                if v.chars().count() > 8 {
                    let prefix: String = v.chars().take(8).collect();
                    write!(f, "Text(\"{}...\")", prefix)
                } else {
                    write!(f, "Text(\"{}\")", v)
                }
            }
            ParameterValue::Integer(v) => write!(f, "Integer({})", v),
            ParameterValue::Float(v) => write!(f, "Float({})", v),
            ParameterValue::DateTime(v) => write!(f, "DateTime({})", v.format(DATE_TIME_FORMAT)),
            ParameterValue::Boolean(v) => write!(f, "Boolean({})", v),
            ParameterValue::Binary(v) => write!(f, "Binary({} bytes)", v.len()),
        }
    }
}

impl ParameterValue {
    /// Get the type of the value
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParameterValue::Text(_) => ParameterType::Text,
            ParameterValue::Integer(_) => ParameterType::Integer,
            ParameterValue::Float(_) => ParameterType::Float,
            ParameterValue::DateTime(_) => ParameterType::DateTime,
            ParameterValue::Boolean(_) => ParameterType::Boolean,
            ParameterValue::Binary(_) => ParameterType::Binary,
        }
    }

    /// Stringify the value for the encrypted display rendering
    ///
    /// Text passes through as-is, numbers render decimal, date/time uses
    /// a fixed format, booleans render `True`/`False`, and binary
    /// payloads render a fixed placeholder.
    pub fn render(&self) -> String {
        match self {
            ParameterValue::Text(v) => v.clone(),
            ParameterValue::Integer(v) => v.to_string(),
            ParameterValue::Float(v) => v.to_string(),
            ParameterValue::DateTime(v) => v.format(DATE_TIME_FORMAT).to_string(),
            ParameterValue::Boolean(v) => {
                if *v {
                    "True".to_string()
                } else {
                    "False".to_string()
                }
            }
            ParameterValue::Binary(_) => BINARY_PLACEHOLDER.to_string(),
        }
    }
}

/// A named, typed statement parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    value: ParameterValue,
    declared_type: ParameterType,
    encrypted: bool,
}

impl Parameter {
    /// Create a parameter
    pub fn new(name: &str, value: ParameterValue, declared_type: ParameterType) -> Self {
        Parameter {
            name: name.to_string(),
            value,
            declared_type,
            encrypted: false,
        }
    }

    /// Parameter name, original casing retained
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter value
    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    /// Declared type, as supplied when the parameter was added
    pub fn declared_type(&self) -> ParameterType {
        self.declared_type
    }

    /// Whether an encrypted rendering has been produced for this
    /// parameter
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Produce the one-way encrypted display rendering
    ///
    /// Format: `<Base64(stringified value)> "_" <hex SHA-256 of that
    /// Base64 string>`. Display and diagnostics only; it carries no key
    /// and is never consumed by deobfuscation. Marks the parameter as
    /// encrypted.
    pub fn render_encrypted(&mut self) -> String {
        let encoded = STANDARD.encode(self.value.render());
        let rendered = format!("{}_{}", encoded, digest_hex(&encoded));
        self.encrypted = true;
        rendered
    }
}

/// Ordered collection of parameters keyed by case-insensitive name
///
/// Backed by a map keyed on the ASCII-lowercased name: insert-or-replace
/// on add, deterministic iteration in key order. A replaced entry's
/// position therefore follows its name, not its original insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    entries: BTreeMap<String, Parameter>,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any existing entry with the same
    /// case-insensitive name
    pub fn add(&mut self, name: &str, value: ParameterValue, declared_type: ParameterType) {
        debug!("adding parameter {} ({:?})", name, declared_type);
        self.entries.insert(
            name.to_ascii_lowercase(),
            Parameter::new(name, value, declared_type),
        );
    }

    /// Look up a parameter by case-insensitive name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// Mutable lookup by case-insensitive name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.entries.get_mut(&name.to_ascii_lowercase())
    }

    /// Remove a parameter by case-insensitive name
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over parameters in name order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.values()
    }

    /// Collect `(name, value)` pairs for the execution collaborator
    pub fn bound(&self) -> Vec<(&str, &ParameterValue)> {
        self.entries
            .values()
            .map(|p| (p.name(), p.value()))
            .collect()
    }
}
