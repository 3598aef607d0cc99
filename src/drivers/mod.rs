mod tokio_postgres;

pub use self::in_memory_test::{
    InMemoryResponse, InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedStatement,
    StatementKind,
};
pub use self::tokio_postgres::TokioPostgresDriver;
