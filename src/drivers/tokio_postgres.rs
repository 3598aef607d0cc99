use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

use crate::connection::ConnectionConfig;
use crate::error::{PgMapError, Result};
use crate::traits::{DatabaseDriver, DriverSession};
use crate::types::{ResultTable, SqlValue, TabularResult};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Statements go through the simple query protocol, so every cell arrives as
/// text (or NULL) and is typed later by the entity mapper.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPostgresDriver;

impl TokioPostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DriverSession>> {
        let (client, connection) = tokio_postgres::connect(config.connection_string(), NoTls)
            .await
            .map_err(|e| PgMapError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Box::new(PostgresSession { client }))
    }
}

struct PostgresSession {
    client: Client,
}

#[async_trait]
impl DriverSession for PostgresSession {
    async fn query(&mut self, sql: &str) -> Result<TabularResult> {
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| PgMapError::QueryFailed(e.to_string()))?;
        Ok(collect_tables(messages))
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| PgMapError::QueryFailed(e.to_string()))?;
        Ok(messages
            .iter()
            .map(|m| match m {
                SimpleQueryMessage::CommandComplete(rows) => *rows,
                _ => 0,
            })
            .sum())
    }
}

/// Group the message stream into one table per result set.
fn collect_tables(messages: Vec<SimpleQueryMessage>) -> TabularResult {
    let mut tables = Vec::new();
    let mut current: Option<ResultTable> = None;
    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                if let Some(table) = current.take() {
                    tables.push(table);
                }
                let columns = columns.iter().map(|c| c.name().to_string()).collect();
                current = Some(ResultTable::new(columns, Vec::new()));
            }
            SimpleQueryMessage::Row(row) => {
                let table = current.get_or_insert_with(|| {
                    let columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                    ResultTable::new(columns, Vec::new())
                });
                let values = (0..row.len())
                    .map(|i| row.get(i).map_or(SqlValue::Null, SqlValue::from))
                    .collect();
                table.rows.push(values);
            }
            SimpleQueryMessage::CommandComplete(_) => {
                if let Some(table) = current.take() {
                    tables.push(table);
                }
            }
            _ => {}
        }
    }
    tables.extend(current);
    TabularResult::new(tables)
}
