//! Conversion between entities and rows, plus statement templating.
//!
//! Templating is literal text replacement, not parameterization: field values
//! are written into the statement unescaped. Never fill templates with
//! untrusted input.

use crate::error::{PgMapError, Result};
use crate::traits::Entity;
use crate::types::{FromSqlValue, ResultTable, RowRef, TabularResult};

const PLACEHOLDER_OPEN: &str = "{this.";

/// Assigns every mappable field of `entity` from the column of the same name.
///
/// Columns without a matching field and fields without a matching column are
/// ignored. If any value cannot be coerced into its field's kind the entity
/// is left untouched and a [`PgMapError::Mapping`] is returned.
pub fn from_row<E: Entity>(entity: &mut E, row: RowRef<'_>) -> Result<()> {
    let mut staged = Vec::new();
    for field in E::fields().iter().filter(|f| f.is_mappable()) {
        let (Some(set), Some(value)) = (field.set, row.try_get(field.name)) else {
            continue;
        };
        let coerced = value
            .clone()
            .coerce(field.kind)
            .ok_or_else(|| PgMapError::Mapping {
                field: field.name,
                value: value.to_string(),
                expected: field.kind,
            })?;
        staged.push((set, coerced));
    }
    for (set, value) in staged {
        set(entity, value);
    }
    Ok(())
}

/// Builds a fresh entity from a row.
pub fn materialize<E: Entity>(row: RowRef<'_>) -> Result<E> {
    let mut entity = E::default();
    from_row(&mut entity, row)?;
    Ok(entity)
}

/// Maps every row of a table, failing on the first row that cannot be mapped.
pub fn map_table<E: Entity>(table: &ResultTable) -> Result<Vec<E>> {
    table.rows().map(materialize::<E>).collect()
}

/// Reads a field as `T`.
///
/// Returns `T`'s zero value when the field does not exist, is write-only,
/// or is declared with a different kind than `T`.
pub fn get_field<T, E>(entity: &E, name: &str) -> T
where
    T: FromSqlValue + Default,
    E: Entity,
{
    E::field(name)
        .filter(|f| f.kind == T::KIND)
        .and_then(|f| f.read(entity))
        .map(T::from_sql_value)
        .unwrap_or_default()
}

/// Reads any field as its text representation, empty when unavailable.
pub fn get_field_text<E: Entity>(entity: &E, name: &str) -> String {
    E::field(name)
        .and_then(|f| f.read(entity))
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// A header-only table whose columns are the readable fields of `E`.
pub fn to_empty_schema<E: Entity>() -> ResultTable {
    let columns = E::fields()
        .iter()
        .filter(|f| f.is_readable())
        .map(|f| f.name.to_string())
        .collect();
    ResultTable::new(columns, Vec::new()).with_name(E::entity_name())
}

/// A single-row table holding the current field values of `entity`.
pub fn to_row<E: Entity>(entity: &E) -> ResultTable {
    let mut table = to_empty_schema::<E>();
    let values = E::fields()
        .iter()
        .filter_map(|f| f.read(entity))
        .collect();
    table.rows.push(values);
    table
}

/// Same as [`to_row`], wrapped as a complete tabular result.
pub fn to_table<E: Entity>(entity: &E) -> TabularResult {
    to_row(entity).into()
}

/// Replaces every `{this.<Field>}` placeholder with the field's text value.
///
/// Placeholders naming unknown or write-only fields are kept verbatim.
/// Substituted values are never re-scanned.
pub fn fill<E: Entity>(template: &str, entity: &E) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_OPEN.len()..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        match E::field(&after[..end]).and_then(|f| f.read(entity)) {
            Some(value) => {
                out.push_str(&value.to_string());
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(PLACEHOLDER_OPEN);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Replaces `{0}`, `{1}`, ... with the parameter at that position.
///
/// Placeholders without a matching parameter are kept verbatim.
pub fn format_positional(statement: &str, params: &[&str]) -> String {
    let mut out = String::with_capacity(statement.len());
    let mut rest = statement;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let digits = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());
        let param = if digits > 0 && after[digits..].starts_with('}') {
            after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|i| params.get(i))
        } else {
            None
        };
        match param {
            Some(param) => {
                out.push_str(param);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
