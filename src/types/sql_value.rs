use std::fmt;

/// Represents a cell or field value in a driver-agnostic way.
/// Drivers are responsible for converting their native values to these.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Bool(bool),
}

/// The declared type of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int32,
    Int64,
    Float64,
    Bool,
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Converts this value into one of the given kind.
    /// `Null` stays `Null`. Returns `None` when the value has no
    /// representation in `kind` (e.g. `"abc"` as an integer).
    pub fn coerce(self, kind: FieldKind) -> Option<SqlValue> {
        match (self, kind) {
            (SqlValue::Null, _) => Some(SqlValue::Null),
            (v @ SqlValue::Text(_), FieldKind::Text)
            | (v @ SqlValue::Int32(_), FieldKind::Int32)
            | (v @ SqlValue::Int64(_), FieldKind::Int64)
            | (v @ SqlValue::Float64(_), FieldKind::Float64)
            | (v @ SqlValue::Bool(_), FieldKind::Bool) => Some(v),
            (v, FieldKind::Text) => Some(SqlValue::Text(v.to_string())),
            (SqlValue::Text(s), kind) => parse_text(s.trim(), kind),
            (SqlValue::Int32(i), FieldKind::Int64) => Some(SqlValue::Int64(i as i64)),
            (SqlValue::Int32(i), FieldKind::Float64) => Some(SqlValue::Float64(i as f64)),
            (SqlValue::Int64(i), FieldKind::Int32) => i32::try_from(i).ok().map(SqlValue::Int32),
            (SqlValue::Int64(i), FieldKind::Float64) => Some(SqlValue::Float64(i as f64)),
            _ => None,
        }
    }

    /// Consumes the value, converting it into `T`.
    /// Values that cannot be represented as `T` yield `T`'s zero value.
    pub fn get<T: FromSqlValue>(self) -> T {
        T::from_sql_value(self)
    }
}

fn parse_text(s: &str, kind: FieldKind) -> Option<SqlValue> {
    match kind {
        FieldKind::Text => Some(SqlValue::Text(s.to_string())),
        FieldKind::Int32 => s.parse().ok().map(SqlValue::Int32),
        FieldKind::Int64 => s.parse().ok().map(SqlValue::Int64),
        FieldKind::Float64 => s.parse().ok().map(SqlValue::Float64),
        // Postgres renders booleans as `t` / `f` in text mode
        FieldKind::Bool => match s.to_ascii_lowercase().as_str() {
            "t" | "true" | "1" => Some(SqlValue::Bool(true)),
            "f" | "false" | "0" => Some(SqlValue::Bool(false)),
            _ => None,
        },
    }
}

/// Text form used for template substitution. `Null` renders as an empty string.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => Ok(()),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Int32(i) => write!(f, "{}", i),
            SqlValue::Int64(i) => write!(f, "{}", i),
            SqlValue::Float64(v) => write!(f, "{}", v),
            SqlValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Rust types that an entity field can be declared as.
pub trait FromSqlValue: Sized {
    /// The field kind this type is declared as.
    const KIND: FieldKind;

    fn from_sql_value(value: SqlValue) -> Self;
}

impl FromSqlValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_sql_value(value: SqlValue) -> Self {
        match value {
            SqlValue::Text(s) => s,
            other => other.to_string(),
        }
    }
}

macro_rules! impl_from_sql_value {
    ($ty:ty, $kind:ident) => {
        impl FromSqlValue for $ty {
            const KIND: FieldKind = FieldKind::$kind;

            fn from_sql_value(value: SqlValue) -> Self {
                match value.coerce(FieldKind::$kind) {
                    Some(SqlValue::$kind(v)) => v,
                    _ => Default::default(),
                }
            }
        }
    };
}

impl_from_sql_value!(i32, Int32);
impl_from_sql_value!(i64, Int64);
impl_from_sql_value!(f64, Float64);
impl_from_sql_value!(bool, Bool);

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn from_sql_value(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => None,
            v => Some(T::from_sql_value(v)),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float64(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
