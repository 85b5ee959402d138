//! Derive macros for sqlforge
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod entity;

/// Derive the `Entity` trait for a struct.
///
/// The attribute walk happens here, once, at compile time: the generated
/// impl reports a static ordered attribute-descriptor list, so statement
/// assembly never inspects types at runtime.
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
///
/// # Attributes
///
/// - `#[entity(table = "name")]` - Table name (defaults to the snake-cased
///   struct name)
/// - `#[field(id)]` - Mark the identity field
/// - `#[field(column = "name")]` - Map a field to a different column name;
///   absence or the sentinel `"-"` keeps the field's own name
///
/// # Mapped kinds
///
/// `String` maps to text, `i32`/`i64` to integer, and
/// `chrono::NaiveDateTime` to timestamp. Fields of any other type are
/// described without a value and never appear in generated clauses.
#[proc_macro_derive(Entity, attributes(entity, field))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
