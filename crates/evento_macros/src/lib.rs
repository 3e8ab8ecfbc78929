//! Evento procedural macros
//!
//! Provides the `EventProps` derive, which projects a typed props struct onto
//! an `evento_core::Props` mapping.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Check if a field is marked `#[evento(skip)]`
fn is_skipped(field: &syn::Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("evento")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported evento attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

/// `on_save_mario` -> `onSaveMario`
fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    for (i, segment) in snake.split('_').filter(|s| !s.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// `on_save_mario` -> `saveMario`; `None` when nothing follows the prefix
fn event_name(field_name: &str) -> Option<String> {
    let rest = camel_case(field_name.strip_prefix("on_")?);
    let valid = rest.starts_with(|c: char| c.is_ascii_lowercase())
        && rest.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(rest)
}

/// Derive macro that maps a props struct onto an `evento_core::Props` mapping.
///
/// Fields named `on_<event>` hold callbacks (`Callback` or `Option<Callback>`)
/// and are stored under `on<Event>`. Every other field is serialized with
/// serde and stored under its camelCase name.
///
/// # Field Attributes
///
/// - `#[evento(skip)]` - Field is not part of the mapping
///
/// # Example
///
/// ```ignore
/// use evento_core::{Callback, EventProps};
///
/// #[derive(EventProps)]
/// pub struct PeachProps {
///     is_bowser_near: bool,                 // -> "isBowserNear"
///     on_save_mario: Option<Callback>,      // -> "onSaveMario"
///     #[evento(skip)]
///     cache: Vec<u8>,
/// }
///
/// assert_eq!(PeachProps::EVENTS, &["saveMario"]);
/// ```
///
/// # Generated Code
///
/// - `impl evento_core::props::EventProps` with `EVENTS` listing the callback
///   events in declaration order and `to_props` building the mapping
#[proc_macro_derive(EventProps, attributes(evento))]
pub fn derive_event_props(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "EventProps can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "EventProps can only be derived for structs",
            ))
        }
    };

    let mut events = Vec::new();
    let mut entries = Vec::new();

    for field in fields {
        if is_skipped(field)? {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let field_name = field_name.trim_start_matches("r#");

        if field_name.starts_with("on_") {
            let event = event_name(field_name).ok_or_else(|| {
                syn::Error::new_spanned(
                    ident,
                    "callback fields must be named `on_<event>` with an alphanumeric event name",
                )
            })?;
            let prop_name = camel_case(field_name);
            entries.push(quote! {
                builder = builder.set(
                    #prop_name,
                    ::evento_core::props::PropValue::from(::std::clone::Clone::clone(&self.#ident)),
                );
            });
            events.push(event);
        } else {
            let prop_name = camel_case(field_name);
            entries.push(quote! {
                builder = builder.data(#prop_name, &self.#ident);
            });
        }
    }

    Ok(quote! {
        impl #impl_generics ::evento_core::props::EventProps for #name #ty_generics #where_clause {
            const EVENTS: &'static [&'static str] = &[#(#events),*];

            fn to_props(
                &self,
            ) -> ::evento_core::error::Result<::std::sync::Arc<::evento_core::props::Props>> {
                #[allow(unused_mut)]
                let mut builder = ::evento_core::props::Props::builder();
                #(#entries)*
                builder.build()
            }
        }
    })
}
