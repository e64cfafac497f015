//! Token generation for the `ClassTemplate` implementation.

use std::collections::BTreeMap;

use heck::ToShoutySnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::parse::{AttributeField, ParsedInput};

/// Name of the associated constant holding `attribute`'s name.
///
/// Class-scoped attributes (uppercase after the underscores) get a `CLASS_`
/// prefix so `count` and `Count` stay distinct. Leading underscores are kept.
pub(crate) fn constant_name(attribute: &str) -> String {
    let letters = attribute.trim_start_matches('_');
    let underscores = "_".repeat(attribute.len() - letters.len());
    let scope = if letters.starts_with(|c: char| c.is_uppercase()) {
        "CLASS_"
    } else {
        ""
    };
    format!("{underscores}{scope}{}", letters.to_shouty_snake_case())
}

fn constants(fields: &[AttributeField]) -> syn::Result<Vec<TokenStream>> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        let constant = constant_name(&field.name);
        if let Some(previous) = seen.insert(constant.clone(), &field.name) {
            return Err(syn::Error::new_spanned(
                &field.ident,
                format!(
                    "attributes '{previous}' and '{}' share the constant name {constant}",
                    field.name
                ),
            ));
        }
        let ident = format_ident!("{}", constant);
        let name = &field.name;
        let doc = format!("Name of the `{name}` attribute.");
        out.push(quote! {
            #[doc = #doc]
            pub const #ident: &'static str = #name;
        });
    }
    Ok(out)
}

/// Generate the `ClassTemplate` impl and the per-attribute constants.
pub(crate) fn class_template(parsed: &ParsedInput, krate: &TokenStream) -> syn::Result<TokenStream> {
    let ident = &parsed.ident;
    let class = parsed.class_name();
    let names = parsed.fields.iter().map(|field| &field.name);
    let constants = constants(&parsed.fields)?;
    Ok(quote! {
        impl #krate::ClassTemplate for #ident {
            const CLASS_NAME: &'static str = #class;
            const ATTRIBUTES: &'static [&'static str] = &[#(#names),*];

            fn template() -> #krate::TranslucentResult<#krate::serde_json::Value> {
                #krate::template_of(&<Self as ::core::default::Default>::default())
            }
        }

        impl #ident {
            #(#constants)*
        }
    })
}
