//! Secure statement: cached obfuscated SQL plus its parameters
//!
//! A [`SecureStatement`] owns one [`ObfuscationEngine`] and keeps only
//! the obfuscated form of its text; the plain SQL exists transiently
//! during assignment and is reconstructed, after signature verification,
//! when the statement is executed or opened. Drivers are reached only
//! through the [`StatementExecutor`] trait.

use log::debug;

use crate::error::{to_execution_error, Error, Result};
use crate::models::{ParameterSet, ParameterType, ParameterValue};
use crate::obfuscation::ObfuscationEngine;

/// External execution collaborator
///
/// The only coupling the statement has to a database driver: bind named
/// parameters and run. Driver failures surface through `Display` and are
/// wrapped as [`Error::Execution`]; note that driver messages may embed
/// plain values.
pub trait StatementExecutor {
    /// Row type produced by `open`
    type Row;

    /// Driver error type
    type Error: std::fmt::Display;

    /// Execute a non-query statement, returning the affected row count
    fn execute(
        &mut self,
        sql: &str,
        params: &[(&str, &ParameterValue)],
    ) -> std::result::Result<u64, Self::Error>;

    /// Open a query statement, returning its rows
    fn open(
        &mut self,
        sql: &str,
        params: &[(&str, &ParameterValue)],
    ) -> std::result::Result<Vec<Self::Row>, Self::Error>;
}

/// A SQL statement held only in obfuscated form
#[derive(Debug, Clone)]
pub struct SecureStatement {
    engine: ObfuscationEngine,
    obfuscated_text: Option<String>,
    parameters: ParameterSet,
}

impl SecureStatement {
    /// Create an empty statement over the given engine
    pub fn new(engine: ObfuscationEngine) -> Self {
        SecureStatement {
            engine,
            obfuscated_text: None,
            parameters: ParameterSet::new(),
        }
    }

    /// Create a statement and assign its text in one step
    pub fn with_text(engine: ObfuscationEngine, sql: &str) -> Self {
        let mut statement = Self::new(engine);
        statement.set_text(sql);
        statement
    }

    /// Assign the statement text
    ///
    /// The plain SQL is obfuscated immediately and only the obfuscated
    /// form is retained; re-assigning recomputes and replaces it.
    pub fn set_text(&mut self, sql: &str) {
        self.obfuscated_text = Some(self.engine.obfuscate(sql));
        debug!("statement text assigned and obfuscated");
    }

    /// The cached obfuscated form, if text has been assigned
    pub fn obfuscated_text(&self) -> Option<&str> {
        self.obfuscated_text.as_deref()
    }

    /// The engine whose key protects this statement
    pub fn engine(&self) -> &ObfuscationEngine {
        &self.engine
    }

    /// Verify and reconstruct the plain SQL
    ///
    /// Surfaces [`Error::Format`] / [`Error::Integrity`] from the
    /// pipeline; a corrupted or tampered statement never yields SQL.
    pub fn plain_sql(&self) -> Result<String> {
        let obfuscated = self.obfuscated_text.as_deref().ok_or_else(|| {
            Error::Statement("no statement text has been assigned".to_string())
        })?;
        self.engine.deobfuscate(obfuscated)
    }

    /// The statement's parameters
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Mutable access to the statement's parameters
    pub fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.parameters
    }

    /// Convenience insert-or-replace for a parameter
    pub fn add_parameter(
        &mut self,
        name: &str,
        value: ParameterValue,
        declared_type: ParameterType,
    ) {
        self.parameters.add(name, value, declared_type);
    }

    /// Verify, reconstruct, and execute the statement
    ///
    /// Returns the affected row count; driver failures are wrapped as
    /// [`Error::Execution`] with the driver's message passed through.
    pub fn execute<E: StatementExecutor>(&self, executor: &mut E) -> Result<u64> {
        let sql = self.plain_sql()?;
        executor
            .execute(&sql, &self.parameters.bound())
            .map_err(to_execution_error)
    }

    /// Verify, reconstruct, and open the statement as a query
    pub fn open<E: StatementExecutor>(&self, executor: &mut E) -> Result<Vec<E::Row>> {
        let sql = self.plain_sql()?;
        executor
            .open(&sql, &self.parameters.bound())
            .map_err(to_execution_error)
    }
}
