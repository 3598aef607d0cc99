mod sql_value;
mod table;

pub use sql_value::{FieldKind, FromSqlValue, SqlValue};
pub use table::{ResultTable, RowRef, TabularResult};
