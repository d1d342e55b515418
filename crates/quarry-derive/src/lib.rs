//! Derive macro for quarry entity schema descriptors.
//!
//! This crate provides the `#[derive(Entity)]` macro, which generates the
//! static attribute table and the get/set accessors the `quarry` runtime
//! maps rows through.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, Meta, parse_macro_input};

/// Derives the `Entity` trait for a struct with named fields.
///
/// Every field becomes an attribute, in declaration order. The attribute
/// name is the field name verbatim; the runtime converts it to a column
/// name through the configured column case.
///
/// # Field Attributes
///
/// - `#[entity(primary_key)]` - Marks the field as the update predicate
/// - `#[entity(excluded)]` - Keeps the field out of generated SQL and
///   out of row mapping
/// - `#[entity(persisted)]` - Marks a `bool` field as the persistence
///   flag backing `is_persisted`/`mark_persisted`. Implies `excluded`.
///   At most one field may carry this marker.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, Entity)]
/// struct User {
///     #[entity(primary_key)]
///     id: i64,
///     username: String,
///     #[entity(excluded)]
///     cached_display: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

struct FieldInfo {
    name: Ident,
    primary_key: bool,
    excluded: bool,
    persisted: bool,
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut field_infos: Vec<FieldInfo> = Vec::new();
    for field in fields {
        let name = field.ident.clone().ok_or_else(|| {
            syn::Error::new_spanned(field, "Entity derive requires named fields")
        })?;
        let mut info = FieldInfo {
            name,
            primary_key: false,
            excluded: false,
            persisted: false,
        };
        parse_entity_attrs(field, &mut info)?;
        field_infos.push(info);
    }

    let primary_keys = field_infos.iter().filter(|f| f.primary_key).count();
    if primary_keys > 1 {
        return Err(syn::Error::new_spanned(
            &input,
            "Entity derive allows at most one #[entity(primary_key)] field",
        ));
    }
    if field_infos.iter().filter(|f| f.persisted).count() > 1 {
        return Err(syn::Error::new_spanned(
            &input,
            "Entity derive allows at most one #[entity(persisted)] field",
        ));
    }

    let attribute_entries: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let name = info.name.to_string();
            let excluded = info.excluded;
            let primary_key = info.primary_key;
            quote! {
                ::quarry::Attribute {
                    name: #name,
                    excluded: #excluded,
                    primary_key: #primary_key,
                }
            }
        })
        .collect();

    let get_arms: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let field = &info.name;
            let name = info.name.to_string();
            quote! {
                #name => ::quarry::Result::Ok(::quarry::ToSqlValue::to_sql_value(
                    ::core::clone::Clone::clone(&self.#field),
                )),
            }
        })
        .collect();

    let set_arms: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let field = &info.name;
            let name = info.name.to_string();
            quote! {
                #name => {
                    self.#field = ::quarry::FromSqlValue::from_sql_value(value)?;
                    ::quarry::Result::Ok(())
                }
            }
        })
        .collect();

    let persisted_impl = field_infos.iter().find(|f| f.persisted).map(|info| {
        let field = &info.name;
        quote! {
            fn is_persisted(&self) -> bool {
                self.#field
            }

            fn mark_persisted(&mut self) {
                self.#field = true;
            }
        }
    });

    let expanded = quote! {
        impl ::quarry::Entity for #struct_name {
            const TYPE_NAME: &'static str = #type_name;

            const ATTRIBUTES: &'static [::quarry::Attribute] = &[
                #(#attribute_entries),*
            ];

            fn get(&self, attribute: &str) -> ::quarry::Result<::quarry::SqlValue> {
                match attribute {
                    #(#get_arms)*
                    _ => ::quarry::Result::Err(::quarry::Error::Mapping(
                        ::std::format!(
                            "unknown attribute `{attribute}` on `{}`",
                            #type_name,
                        ),
                    )),
                }
            }

            fn set(
                &mut self,
                attribute: &str,
                value: ::quarry::SqlValue,
            ) -> ::quarry::Result<()> {
                match attribute {
                    #(#set_arms)*
                    _ => ::quarry::Result::Err(::quarry::Error::Mapping(
                        ::std::format!(
                            "unknown attribute `{attribute}` on `{}`",
                            #type_name,
                        ),
                    )),
                }
            }

            #persisted_impl
        }
    };

    Ok(expanded)
}

fn parse_entity_attrs(field: &syn::Field, info: &mut FieldInfo) -> syn::Result<()> {
    for attr in &field.attrs {
        if attr.path().is_ident("entity") {
            // Handle empty attribute like #[entity]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    info.primary_key = true;
                } else if meta.path.is_ident("excluded") {
                    info.excluded = true;
                } else if meta.path.is_ident("persisted") {
                    info.persisted = true;
                    info.excluded = true;
                } else {
                    return Err(meta.error("unrecognized entity attribute"));
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}
