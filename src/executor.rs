use std::sync::{Arc, PoisonError, RwLock};

use tokio::task::JoinHandle;

use crate::connection::{ConnectionConfig, RelationalConnection};
use crate::mapper;
use crate::traits::{DatabaseDriver, Entity, LogSink, QueryListener, SenderId, Severity, TraceSink};
use crate::types::TabularResult;

const TYPE_NAME: &str = "QueryExecutor";

/// Message of the error notification sent when no session could be opened.
pub const CONNECTION_FAILED: &str = "connection failed";

/// Prefix of the error notification sent when the statement task panicked.
pub const TASK_FAILED: &str = "query task failed";

/// What a single run produced. Exactly one variant per run.
#[derive(Debug, Clone)]
pub enum QueryOutcome<T> {
    Error(String),
    Success {
        result: TabularResult,
        entities: Vec<T>,
    },
}

impl<T> QueryOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryOutcome::Error(message) => Some(message),
            QueryOutcome::Success { .. } => None,
        }
    }

    pub fn entities(&self) -> Option<&[T]> {
        match self {
            QueryOutcome::Error(_) => None,
            QueryOutcome::Success { entities, .. } => Some(entities),
        }
    }
}

pub(crate) type ListenerList<T> = Arc<RwLock<Vec<Arc<dyn QueryListener<T>>>>>;

/// Copy of the current listeners, so callbacks run without holding the lock.
pub(crate) fn snapshot<T>(listeners: &ListenerList<T>) -> Vec<Arc<dyn QueryListener<T>>> {
    listeners
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub(crate) fn add_listener<T>(listeners: &ListenerList<T>, listener: Arc<dyn QueryListener<T>>) {
    listeners
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(listener);
}

fn notify<T>(listeners: &ListenerList<T>, sender: SenderId, outcome: &QueryOutcome<T>) {
    let listeners = snapshot(listeners);
    match outcome {
        QueryOutcome::Error(message) => {
            for listener in &listeners {
                listener.error_received(sender, message);
            }
        }
        QueryOutcome::Success { result, entities } => {
            for listener in &listeners {
                listener.tabular_result_received(sender, result);
            }
            for listener in &listeners {
                listener.entities_received(sender, entities);
            }
        }
    }
}

/// Runs statements for entity type `T` and reports through notifications.
///
/// Every run opens its own [`RelationalConnection`] on a background task, so
/// concurrent runs share nothing but the listener list.
pub struct QueryExecutor<T: Entity> {
    id: SenderId,
    driver: Arc<dyn DatabaseDriver>,
    config: ConnectionConfig,
    trace: Arc<dyn TraceSink>,
    listeners: ListenerList<T>,
}

impl<T: Entity> QueryExecutor<T> {
    pub fn new(driver: Arc<dyn DatabaseDriver>, config: ConnectionConfig) -> Self {
        Self {
            id: SenderId::next(),
            driver,
            config,
            trace: Arc::new(LogSink),
            listeners: ListenerList::default(),
        }
    }

    /// Replace the default `log`-backed trace sink.
    pub fn with_trace_sink(mut self, trace: Arc<dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    pub fn id(&self) -> SenderId {
        self.id
    }

    pub fn subscribe(&self, listener: Arc<dyn QueryListener<T>>) {
        add_listener(&self.listeners, listener);
    }

    /// Run a statement in the background.
    ///
    /// Non-empty `params` replace `{0}`, `{1}`, ... in `statement` first.
    /// Listeners are notified before the returned handle resolves. A panic
    /// in the driver is reported as an error notification like any failure.
    /// Must be called within a Tokio runtime.
    pub fn run(&self, statement: &str, params: &[&str]) -> JoinHandle<QueryOutcome<T>> {
        let statement = if params.is_empty() {
            statement.to_string()
        } else {
            mapper::format_positional(statement, params)
        };
        self.trace.write(Severity::Debug, TYPE_NAME, "run", &statement);

        let connection = RelationalConnection::new(Arc::clone(&self.driver), self.config.clone());
        let trace = Arc::clone(&self.trace);
        let listeners = Arc::clone(&self.listeners);
        let sender = self.id;
        tokio::spawn(async move {
            let task = {
                let trace = Arc::clone(&trace);
                let statement = statement.clone();
                tokio::spawn(
                    async move { execute::<T>(connection, &statement, trace.as_ref()).await },
                )
            };
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    trace.write(Severity::Error, TYPE_NAME, "run", &e.to_string());
                    QueryOutcome::Error(format!("{}: {}", TASK_FAILED, statement))
                }
            };
            notify(&listeners, sender, &outcome);
            outcome
        })
    }
}

async fn execute<T: Entity>(
    mut connection: RelationalConnection,
    statement: &str,
    trace: &dyn TraceSink,
) -> QueryOutcome<T> {
    if let Err(e) = connection.connect().await {
        trace.write(Severity::Warning, TYPE_NAME, "run", &e.to_string());
        return QueryOutcome::Error(CONNECTION_FAILED.to_string());
    }

    let result = match connection.execute(statement).await {
        Ok(result) => result,
        Err(e) => {
            log::debug!("{}", e);
            trace.write(Severity::Error, TYPE_NAME, "run", statement);
            return QueryOutcome::Error(format!("unknown SQL error: {}", statement));
        }
    };

    // Map before notifying so a bad row cannot follow a success notification
    let entities = match result.first() {
        Some(table) => mapper::map_table::<T>(table),
        None => Ok(Vec::new()),
    };
    match entities {
        Ok(entities) => QueryOutcome::Success { result, entities },
        Err(e) => {
            trace.write(Severity::Error, TYPE_NAME, "run", &e.to_string());
            QueryOutcome::Error(format!("mapping failed: {}", e))
        }
    }
}
