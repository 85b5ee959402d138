//! The record contract and the introspection pass.
//!
//! An [`Entity`] is any value type that can describe itself as an ordered
//! list of typed, named attributes. `#[derive(Entity)]` generates the
//! implementation from field annotations at compile time, so no runtime
//! type inspection happens on the hot path; hand-written impls work the
//! same way.

use crate::value::Value;

/// The record contract consumed by statements.
///
/// # Example
///
/// ```ignore
/// use sqlforge::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "user")]
/// struct User {
///     #[field(id)]
///     id: i32,
///     name: String,
///     #[field(column = "create_date")]
///     created: chrono::NaiveDateTime,
/// }
/// ```
pub trait Entity {
    /// Table/collection name this record maps to.
    fn table(&self) -> &str;

    /// Identity column name and current value, if the type designates one.
    ///
    /// Identity-based operations (`by_id`, `fetch_one` via id) fail with
    /// [`ForgeError::MissingId`](crate::ForgeError::MissingId) when this
    /// returns `None` or an empty column name.
    fn id(&self) -> Option<(&'static str, Value)>;

    /// All attributes in declaration order, mapped or not.
    fn attrs(&self) -> Vec<Attr>;

    /// Write one attribute back by its logical name, used when decoding a
    /// result row. Unknown names and kind-mismatched values are ignored.
    fn set_attr(&mut self, name: &str, value: Value);
}

/// One described attribute of a record, as reported by [`Entity::attrs`].
#[derive(Debug, Clone)]
pub struct Attr {
    /// Attribute name in the host type.
    pub name: &'static str,
    /// Destination column (defaults to `name` when no mapping is given).
    pub column: &'static str,
    /// Typed value, `None` when the attribute's kind is not mappable.
    pub value: Option<Value>,
}

/// One introspected field of a record, immutable once derived.
#[derive(Debug, Clone)]
pub struct Field {
    /// Attribute name in the host type.
    pub name: &'static str,
    /// Destination column name.
    pub column: &'static str,
    /// Pre-rendered, quote-wrapped textual form, used only in literal mode.
    pub literal: String,
    /// The original typed value, used when filling placeholder bindings.
    pub raw: Value,
}

/// Derive the ordered field list from a record value.
///
/// Attributes are visited in declaration order. An attribute is dropped when
/// a filter list is supplied and neither its name nor its column appears in
/// it, when its kind yields no [`Value`], or when its literal form renders
/// empty.
pub(crate) fn introspect<E: Entity>(entity: &E, filter: Option<&[String]>) -> Vec<Field> {
    entity
        .attrs()
        .into_iter()
        .filter_map(|attr| {
            if let Some(keep) = filter {
                if !keep.iter().any(|k| k == attr.name || k == attr.column) {
                    return None;
                }
            }
            let raw = attr.value?;
            let literal = raw.literal();
            if literal.is_empty() {
                return None;
            }
            Some(Field {
                name: attr.name,
                column: attr.column,
                literal,
                raw,
            })
        })
        .collect()
}
