//! Console walkthrough of the obfuscation pipeline
//!
//! Builds an engine, obfuscates a statement, renders encrypted
//! parameters, and runs the statement against an in-memory executor so
//! the whole flow is visible without a real database. Set `RUST_LOG` to
//! see the pipeline's log output.

use sqlveil::{
    ConnectionOpener, ConnectionVault, ObfuscationEngine, ParameterType, ParameterValue,
    SecureStatement, StatementExecutor,
};

/// Executor that prints what it would run instead of touching a driver
struct ConsoleExecutor;

impl StatementExecutor for ConsoleExecutor {
    type Row = String;
    type Error = String;

    fn execute(
        &mut self,
        sql: &str,
        params: &[(&str, &ParameterValue)],
    ) -> Result<u64, String> {
        println!("  executing: {}", sql);
        for (name, value) in params {
            println!("  bind {} = {:?}", name, value);
        }
        Ok(params.len() as u64)
    }

    fn open(
        &mut self,
        sql: &str,
        params: &[(&str, &ParameterValue)],
    ) -> Result<Vec<String>, String> {
        self.execute(sql, params)?;
        Ok(vec!["Customer #1".to_string(), "Customer #2".to_string()])
    }
}

/// Opener that fabricates a handle from the plain connection string
struct ConsoleOpener;

impl ConnectionOpener for ConsoleOpener {
    type Connection = String;
    type Error = String;

    fn open(&self, connection_string: &str) -> Result<String, String> {
        Ok(format!("handle({} bytes)", connection_string.len()))
    }
}

fn main() -> sqlveil::Result<()> {
    env_logger::init();

    let dsn = "Driver=Demo;Server=localhost;Database=Northwind;Uid=demo;Pwd=demo";

    let mut vault = ConnectionVault::new(ConsoleOpener);
    vault.add_connection("northwind", dsn)?;
    println!("vault entry: {}", vault.encrypted_connection_string("northwind").unwrap());
    println!(
        "decrypts to: {}",
        vault.decrypt_connection_string("northwind")?.unwrap()
    );

    let engine = ObfuscationEngine::new(dsn);
    let mut statement =
        SecureStatement::with_text(engine, "SELECT * FROM Customers WHERE Status = :Status");
    statement.add_parameter(
        "Status",
        ParameterValue::Text("Active".to_string()),
        ParameterType::Text,
    );

    println!("obfuscated: {}", statement.obfuscated_text().unwrap());
    if let Some(param) = statement.parameters_mut().get_mut("Status") {
        println!("parameter display form: {}", param.render_encrypted());
    }

    let rows = statement.open(&mut ConsoleExecutor)?;
    for row in rows {
        println!("  row: {}", row);
    }

    vault.remove_connection("northwind");
    Ok(())
}
