use async_trait::async_trait;

use crate::connection::ConnectionConfig;
use crate::error::Result;
use crate::types::TabularResult;

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Opening a session from a connection configuration
/// - Converting native cell values to `SqlValue`
/// - Collecting every result set of a statement into a `TabularResult`
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a new session. Each call yields an independent session; drivers
    /// must not share one between callers.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DriverSession>>;
}

/// An open session on the server.
#[async_trait]
pub trait DriverSession: Send {
    /// Run literal statement text and collect its result sets.
    async fn query(&mut self, sql: &str) -> Result<TabularResult>;

    /// Run literal statement text that produces no result set.
    /// Returns the number of affected rows.
    async fn execute(&mut self, sql: &str) -> Result<u64>;
}
