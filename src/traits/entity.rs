use crate::types::{FieldKind, SqlValue};

/// Name of the mandatory identity field every entity declares.
pub const ID_FIELD: &str = "ID";

/// Compile-time descriptor of one entity field.
///
/// A field takes part in row mapping when it is both readable and writable
/// and its name equals a column name exactly.
pub struct Field<E> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: Option<fn(&E) -> SqlValue>,
    pub set: Option<fn(&mut E, SqlValue)>,
}

impl<E> Field<E> {
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        get: fn(&E) -> SqlValue,
        set: fn(&mut E, SqlValue),
    ) -> Self {
        Self {
            name,
            kind,
            get: Some(get),
            set: Some(set),
        }
    }

    pub const fn read_only(name: &'static str, kind: FieldKind, get: fn(&E) -> SqlValue) -> Self {
        Self {
            name,
            kind,
            get: Some(get),
            set: None,
        }
    }

    pub const fn write_only(
        name: &'static str,
        kind: FieldKind,
        set: fn(&mut E, SqlValue),
    ) -> Self {
        Self {
            name,
            kind,
            get: None,
            set: Some(set),
        }
    }

    pub fn is_readable(&self) -> bool {
        self.get.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }

    pub fn is_mappable(&self) -> bool {
        self.is_readable() && self.is_writable()
    }

    /// Reads the field, `None` if it is write-only.
    pub fn read(&self, entity: &E) -> Option<SqlValue> {
        self.get.map(|get| get(entity))
    }
}

/// Trait representing a typed record mapped to one relational row.
///
/// # Example
/// ```
/// use pgmap::{Entity, Field, FieldKind};
///
/// #[derive(Debug, Default)]
/// struct Customer {
///     id: String,
///     name: String,
/// }
///
/// impl Entity for Customer {
///     fn entity_name() -> &'static str {
///         "Customer"
///     }
///
///     fn fields() -> &'static [Field<Self>] {
///         static FIELDS: [Field<Customer>; 2] = [
///             Field::new("ID", FieldKind::Text, |c| c.id.clone().into(), |c, v| c.id = v.get()),
///             Field::new("Name", FieldKind::Text, |c| c.name.clone().into(), |c, v| c.name = v.get()),
///         ];
///         &FIELDS
///     }
/// }
///
/// assert_eq!(Customer::with_id("7").id(), "7");
/// ```
pub trait Entity: Default + Send + Sync + 'static {
    /// Name used for tables built from this entity.
    fn entity_name() -> &'static str;

    /// Field descriptors in declaration order.
    fn fields() -> &'static [Field<Self>];

    /// Human-readable labels keyed by field name. Metadata only.
    fn labels() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }

    fn label_of(name: &str) -> Option<&'static str> {
        Self::labels()
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, label)| *label)
    }

    /// Text of the identity field, empty when unset.
    fn id(&self) -> String {
        Self::field(ID_FIELD)
            .and_then(|f| f.read(self))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// A default instance carrying only the given identity.
    fn with_id(id: &str) -> Self {
        let mut entity = Self::default();
        if let Some(set) = Self::field(ID_FIELD).and_then(|f| f.set) {
            set(&mut entity, SqlValue::from(id));
        }
        entity
    }
}
