//! pgmap - typed entities over literal SQL statements
//!
//! Entities describe their fields once, as a static list of named accessors.
//! Rows are mapped onto entities by exact column name, and CRUD statement
//! templates are filled from entity fields and run in the background, with
//! results reported to listeners.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use pgmap::{ConnectionConfig, PgMapClient};
//!
//! let client = PgMapClient::postgres(ConnectionConfig::new("postgres://localhost/mydb"));
//! let customers = client.provider_for::<Customer>();
//! customers.subscribe(Arc::new(PrintCustomers));
//!
//! // Runs "SELECT * FROM Customer WHERE ID=7" and notifies PrintCustomers
//! let outcome = customers.select(&Customer::with_id("7")).await?;
//! ```
//!
//! Statement text is built by plain string substitution. Values are not
//! escaped, so templates and positional parameters must never carry
//! untrusted input.

pub mod connection;
pub mod drivers;
pub mod error;
pub mod executor;
pub mod mapper;
pub mod statement;
pub mod traits;
pub mod types;

mod client;

// Re-export main types for convenient access
pub use client::PgMapClient;
pub use connection::{
    ConnectionConfig, ConnectionState, ExecutionResult, RelationalConnection, StatusCode,
};
pub use error::{PgMapError, Result};
pub use executor::{QueryExecutor, QueryOutcome};
pub use statement::{EntityStatements, StatementProvider, StatementRunner, StatementTemplates};
pub use traits::{
    DatabaseDriver, DriverSession, Entity, Field, LogSink, QueryListener, SenderId, Severity,
    TraceSink,
};
pub use types::{FieldKind, FromSqlValue, ResultTable, RowRef, SqlValue, TabularResult};
