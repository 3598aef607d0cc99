use crate::error::{PgMapError, Result};
use crate::types::SqlValue;

/// One result set: ordered column names and rows holding one value per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    /// Table name, if known (set for tables built from an entity)
    pub name: Option<String>,
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            name: None,
            columns,
            rows,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if a column with exactly this name exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Iterates the rows as name-addressable views.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Returns the row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Extracts the only row of the table.
    /// Returns an error if the table contains zero or more than one row.
    pub fn single_row(&self) -> Result<RowRef<'_>> {
        if self.rows.len() != 1 {
            return Err(PgMapError::UnexpectedRowCount {
                expected: 1,
                actual: self.rows.len(),
            });
        }
        self.row(0).ok_or(PgMapError::UnexpectedRowCount {
            expected: 1,
            actual: 0,
        })
    }

    /// Returns the number of rows in this table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this table contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A borrowed row of a [`ResultTable`], values accessed by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [SqlValue],
}

impl<'a> RowRef<'a> {
    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Result<&'a SqlValue> {
        self.try_get(column)
            .ok_or_else(|| PgMapError::ColumnNotFound(column.to_string()))
    }

    /// Gets a value by column name, `None` if the column is absent.
    pub fn try_get(&self, column: &str) -> Option<&'a SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn values(&self) -> &'a [SqlValue] {
        self.values
    }
}

/// Everything a single statement execution produced: zero or more result sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    pub tables: Vec<ResultTable>,
}

impl TabularResult {
    pub fn new(tables: Vec<ResultTable>) -> Self {
        Self { tables }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The first result set, which is the one mapped to entities.
    pub fn first(&self) -> Option<&ResultTable> {
        self.tables.first()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(ResultTable::is_empty)
    }
}

impl From<ResultTable> for TabularResult {
    fn from(table: ResultTable) -> Self {
        Self {
            tables: vec![table],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> ResultTable {
        ResultTable::new(
            vec!["id".to_string(), "name".to_string()],
            vec![vec![SqlValue::from("1"), SqlValue::from("John")]],
        )
    }

    #[test]
    fn test_row_get() {
        let table = users();
        let row = table.single_row().unwrap();

        assert_eq!(row.get("id").unwrap(), &SqlValue::from("1"));
        assert_eq!(row.get("name").unwrap(), &SqlValue::from("John"));
        assert!(matches!(
            row.get("missing"),
            Err(PgMapError::ColumnNotFound(c)) if c == "missing"
        ));
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let table = users();
        assert!(table.has_column("name"));
        assert!(!table.has_column("Name"));
    }

    #[test]
    fn test_single_row_error_on_empty() {
        let table = ResultTable::new(vec!["id".to_string()], vec![]);
        let err = table.single_row().unwrap_err();
        match err {
            PgMapError::UnexpectedRowCount { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            _ => panic!("Expected UnexpectedRowCount error"),
        }
    }

    #[test]
    fn test_single_row_error_on_multiple() {
        let table = ResultTable::new(
            vec!["id".to_string()],
            vec![vec![SqlValue::from("1")], vec![SqlValue::from("2")]],
        );
        let err = table.single_row().unwrap_err();
        match err {
            PgMapError::UnexpectedRowCount { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            _ => panic!("Expected UnexpectedRowCount error"),
        }
    }

    #[test]
    fn test_first_table() {
        let result = TabularResult::from(users());
        assert_eq!(result.first().map(ResultTable::len), Some(1));
        assert!(TabularResult::empty().first().is_none());
        assert!(TabularResult::empty().is_empty());
    }
}
