//! Entity derive macro implementation

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// The value kinds the assembler maps; everything else is described without
/// a value and dropped during introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    I32,
    I64,
    Timestamp,
    Unsupported,
}

/// Helper struct for parsing `#[field(...)]` attributes
struct FieldAttr {
    is_id: bool,
    column: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut is_id = false;
        let mut column = None;

        // Parse comma-separated `id` markers and `column = "..."` pairs
        loop {
            if input.is_empty() {
                break;
            }

            if input.peek(syn::Ident) {
                let ident: syn::Ident = input.parse()?;
                if ident == "id" {
                    is_id = true;
                    if input.peek(syn::Token![,]) {
                        let _: syn::Token![,] = input.parse()?;
                    }
                    continue;
                }
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;

                if ident == "column" {
                    column = Some(value.value());
                } else {
                    return Err(syn::Error::new_spanned(
                        &ident,
                        format!("unknown field attribute `{ident}`"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(FieldAttr { is_id, column })
    }
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let table_name = get_table_name(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ))
        }
    };

    let mut attr_entries = Vec::with_capacity(fields.len());
    let mut decode_arms = Vec::with_capacity(fields.len());
    let mut id_entry: Option<TokenStream> = None;

    for field in fields.iter() {
        let field_ident = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "Entity fields must be named")
        })?;
        let field_name = field_ident.to_string();
        let field_attr = parse_field_attr(field)?;

        // Absence and the `-` sentinel both mean "use the field's own name".
        let column = match field_attr.column {
            Some(col) if col != "-" => col,
            _ => field_name.clone(),
        };

        let kind = value_kind(&field.ty);

        let value_expr = match kind {
            Kind::Text => Some(quote! { sqlforge::Value::Text(self.#field_ident.clone()) }),
            Kind::I32 => Some(quote! { sqlforge::Value::Int(self.#field_ident as i64) }),
            Kind::I64 => Some(quote! { sqlforge::Value::Int(self.#field_ident) }),
            Kind::Timestamp => Some(quote! { sqlforge::Value::Timestamp(self.#field_ident) }),
            Kind::Unsupported => None,
        };

        let attr_value = match &value_expr {
            Some(expr) => quote! { ::std::option::Option::Some(#expr) },
            None => quote! { ::std::option::Option::None },
        };
        attr_entries.push(quote! {
            sqlforge::Attr {
                name: #field_name,
                column: #column,
                value: #attr_value,
            }
        });

        match kind {
            Kind::Text => decode_arms.push(quote! {
                (#field_name, sqlforge::Value::Text(v)) => self.#field_ident = v,
            }),
            Kind::I32 => decode_arms.push(quote! {
                (#field_name, sqlforge::Value::Int(v)) => self.#field_ident = v as i32,
            }),
            Kind::I64 => decode_arms.push(quote! {
                (#field_name, sqlforge::Value::Int(v)) => self.#field_ident = v,
            }),
            Kind::Timestamp => decode_arms.push(quote! {
                (#field_name, sqlforge::Value::Timestamp(v)) => self.#field_ident = v,
            }),
            Kind::Unsupported => {}
        }

        if field_attr.is_id {
            if id_entry.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Entity supports at most one #[field(id)] field",
                ));
            }
            let Some(expr) = &value_expr else {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[field(id)] requires a mappable type (String, i32, i64, NaiveDateTime)",
                ));
            };
            id_entry = Some(quote! {
                ::std::option::Option::Some((#column, #expr))
            });
        }
    }

    let id_body = id_entry.unwrap_or_else(|| quote! { ::std::option::Option::None });

    Ok(quote! {
        impl #impl_generics sqlforge::Entity for #name #ty_generics #where_clause {
            fn table(&self) -> &str {
                #table_name
            }

            fn id(&self) -> ::std::option::Option<(&'static str, sqlforge::Value)> {
                #id_body
            }

            fn attrs(&self) -> ::std::vec::Vec<sqlforge::Attr> {
                ::std::vec![
                    #(#attr_entries),*
                ]
            }

            fn set_attr(&mut self, name: &str, value: sqlforge::Value) {
                match (name, value) {
                    #(#decode_arms)*
                    _ => {}
                }
            }
        }
    })
}

/// Extract the table name from `#[entity(table = "...")]`, defaulting to
/// the snake-cased struct name.
fn get_table_name(input: &DeriveInput) -> Result<String> {
    for attr in &input.attrs {
        if attr.path().is_ident("entity") {
            let nested = attr.parse_args::<syn::MetaNameValue>()?;
            if nested.path.is_ident("table") {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit),
                    ..
                }) = &nested.value
                {
                    return Ok(lit.value());
                }
            }
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[entity(table = \"...\")]",
            ));
        }
    }
    Ok(input.ident.to_string().to_snake_case())
}

fn parse_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    for attr in &field.attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr {
        is_id: false,
        column: None,
    })
}

/// Map a field type to its value kind by the last path segment. Only plain
/// path types are recognized; references, options, and everything else are
/// unsupported and silently unmapped.
fn value_kind(ty: &syn::Type) -> Kind {
    let syn::Type::Path(type_path) = ty else {
        return Kind::Unsupported;
    };
    let Some(seg) = type_path.path.segments.last() else {
        return Kind::Unsupported;
    };
    match seg.ident.to_string().as_str() {
        "String" => Kind::Text,
        "i32" => Kind::I32,
        "i64" => Kind::I64,
        "NaiveDateTime" => Kind::Timestamp,
        _ => Kind::Unsupported,
    }
}
