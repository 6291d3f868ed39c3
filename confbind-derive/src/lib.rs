//! Derive macro for confbind settings manifests
//!
//! This crate provides `#[derive(Settings)]`, which generates the
//! `confbind::Settings` field manifest from a struct definition.
//!
//! # Usage
//!
//! ```text
//! use confbind::DeriveSettings;
//!
//! #[derive(Default, DeriveSettings)]
//! struct AppSettings {
//!     #[setting(flatten)]
//!     base: AppConfigurationSettings,
//!
//!     #[setting(key = "database")]
//!     database_setting: DatabaseSetting,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Lit, Meta,
    PathArguments, Type,
};

/// Scalar types the binder converts from a single string value
const LEAF_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
    "usize", "f32", "f64", "String", "PathBuf", "Duration", "Uuid", "OffsetDateTime",
    "PrimitiveDateTime", "Date", "IpAddr", "Ipv4Addr", "Ipv6Addr", "SocketAddr", "Decimal",
];

/// Derive macro for generating `Settings` implementations.
///
/// Each named field becomes a manifest entry whose declared name is the
/// field name in PascalCase (`mq_address` becomes `MqAddress`).
///
/// # Field attributes (`#[setting(...)]`)
/// - `key = "..."` - Explicit configuration key
/// - `name = "..."` - Declared name override
/// - `nested` / `leaf` - Force the field kind instead of inferring it
/// - `flatten` - Bind the field's settings from the parent section
/// - `skip` - Leave the field out of the manifest
///
/// Without `key`, a `#[serde(rename = "...")]` is used as the explicit key.
/// Scalar types (numbers, `String`, `Duration`, `Uuid`, ...) and any generic
/// type such as `Option<T>` are leaves; other types are nested settings.
#[proc_macro_derive(Settings, attributes(setting))]
pub fn derive_settings(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Settings can only be derived for structs with named fields.\n\nExample:\n  #[derive(Settings)]\n  struct MySettings {\n      field: Type,\n  }",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Settings can only be derived for structs.\n\nTry: #[derive(Settings)] on a struct, not an enum or union.",
            ));
        }
    };

    let mut entries = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;

        // Skip fields marked with #[setting(skip)]
        if attrs.skip {
            continue;
        }

        let declared = attrs
            .name
            .clone()
            .unwrap_or_else(|| to_pascal_case(&ident.to_string()));

        let kind = match attrs.kind {
            Some(kind) => kind,
            None if is_leaf_type(&field.ty) => Kind::Leaf,
            None => Kind::Nested,
        };
        let constructor = match kind {
            Kind::Leaf => quote! { leaf },
            Kind::Nested => quote! { nested },
            Kind::Flatten => quote! { flatten },
        };

        let key = attrs.key.or_else(|| serde_rename(&field.attrs));
        let key_call = key.map(|k| quote! { .key(#k) });

        entries.push(quote! {
            ::confbind::Field::#constructor(#declared, |s: &mut Self| &mut s.#ident) #key_call
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::confbind::Settings for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::confbind::Field<Self>> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Leaf,
    Nested,
    Flatten,
}

/// Field-level attributes from #[setting(...)]
#[derive(Default)]
struct FieldAttrs {
    key: Option<String>,
    name: Option<String>,
    kind: Option<Kind>,
    skip: bool,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("setting") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;

        for meta in nested {
            match &meta {
                Meta::Path(path) => {
                    let kind = if path.is_ident("skip") {
                        result.skip = true;
                        continue;
                    } else if path.is_ident("leaf") {
                        Kind::Leaf
                    } else if path.is_ident("nested") {
                        Kind::Nested
                    } else if path.is_ident("flatten") {
                        Kind::Flatten
                    } else {
                        return Err(syn::Error::new_spanned(
                            path,
                            "unknown #[setting] flag.\n\nExpected one of: skip, leaf, nested, flatten",
                        ));
                    };
                    if result.kind.is_some_and(|k| k != kind) {
                        return Err(syn::Error::new_spanned(
                            path,
                            "conflicting field kinds in #[setting(...)]",
                        ));
                    }
                    result.kind = Some(kind);
                }
                Meta::NameValue(nv) => {
                    let value = string_literal(&nv.value).ok_or_else(|| {
                        syn::Error::new_spanned(
                            &nv.value,
                            "#[setting] values must be string literals.\n\nExample: #[setting(key = \"database_name\")]",
                        )
                    })?;
                    if nv.path.is_ident("key") {
                        if value.trim().is_empty() {
                            return Err(syn::Error::new_spanned(
                                &nv.value,
                                "#[setting(key)] must not be blank",
                            ));
                        }
                        result.key = Some(value);
                    } else if nv.path.is_ident("name") {
                        result.name = Some(value);
                    } else {
                        return Err(syn::Error::new_spanned(
                            &nv.path,
                            "unknown #[setting] option.\n\nExpected one of: key, name",
                        ));
                    }
                }
                Meta::List(list) => {
                    return Err(syn::Error::new_spanned(
                        list,
                        "unexpected list in #[setting(...)]",
                    ));
                }
            }
        }
    }

    Ok(result)
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

/// `#[serde(rename = "...")]`, if present
fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| {
            attr.parse_args_with(
                syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
            )
            .ok()
        })
        .flatten()
        .find_map(|meta| match meta {
            Meta::NameValue(nv) if nv.path.is_ident("rename") => string_literal(&nv.value),
            _ => None,
        })
}

/// Whether a type is converted from a single value rather than bound as a section
fn is_leaf_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => {
            let Some(last) = path.path.segments.last() else {
                return true;
            };
            // Option<T>, Vec<T> and friends are treated as scalars
            if let PathArguments::AngleBracketed(args) = &last.arguments {
                return args
                    .args
                    .iter()
                    .any(|a| matches!(a, GenericArgument::Type(_)));
            }
            LEAF_TYPES.contains(&last.ident.to_string().as_str())
        }
        Type::Reference(_) | Type::Array(_) | Type::Slice(_) | Type::Tuple(_) => true,
        Type::Paren(inner) => is_leaf_type(&inner.elem),
        Type::Group(inner) => is_leaf_type(&inner.elem),
        _ => true,
    }
}

/// `mq_address` -> `MqAddress`; raw identifiers lose their `r#` prefix
fn to_pascal_case(name: &str) -> String {
    name.trim_start_matches("r#")
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
