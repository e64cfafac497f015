//! Parsing of the deriving struct and its attributes.

mod serde_attrs;

use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Token, parenthesized};

use serde_attrs::{
    reject_conditional_skip, serde_field_rename, serde_rename_all, serde_skips,
};

/// Struct-level `#[translucent(...)]` settings.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    pub class: Option<String>,
    pub crate_path: Option<syn::Path>,
}

/// One attribute of the generated template.
#[derive(Clone)]
pub(crate) struct AttributeField {
    /// Key serde emits for the field, which is the attribute name.
    pub name: String,
    pub ident: syn::Ident,
}

/// Everything the generator needs from the input.
pub(crate) struct ParsedInput {
    pub ident: syn::Ident,
    pub attrs: StructAttrs,
    pub fields: Vec<AttributeField>,
}

impl ParsedInput {
    /// Class name: the explicit `class` attribute or the struct name.
    pub(crate) fn class_name(&self) -> String {
        self.attrs
            .class
            .clone()
            .unwrap_or_else(|| self.ident.unraw().to_string())
    }
}

fn discard_unknown(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Extract `#[translucent(class = "...", crate = "...")]`.
///
/// Unknown keys are rejected so typos surface at compile time.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("translucent")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("class") {
                let value = meta.value()?.parse::<LitStr>()?;
                out.class = Some(value.value());
            } else if meta.path.is_ident("crate") {
                let value = meta.value()?.parse::<LitStr>()?;
                out.crate_path = Some(value.parse()?);
            } else {
                return Err(meta.error("expected `class` or `crate`"));
            }
            Ok(())
        })?;
    }
    if let Some(class) = &out.class
        && class.split("::").any(|segment| segment.trim().is_empty())
    {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            format!("invalid class name '{class}'"),
        ));
    }
    Ok(out)
}

/// Parse the deriving struct, computing serde's key for every serialized
/// field.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let ident = input.ident.clone();
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Translucent cannot be derived for generic structs",
        ));
    }
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Translucent requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &ident,
                "Translucent can only be derived for structs",
            ));
        }
    };

    let rename_all = serde_rename_all(&input.attrs)?;
    let mut fields = Vec::new();
    for field in named {
        if serde_skips(&field.attrs)? {
            continue;
        }
        reject_conditional_skip(&field.attrs)?;
        let Some(field_ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
        };
        let name = serde_field_rename(&field.attrs)?.unwrap_or_else(|| {
            let raw = field_ident.unraw().to_string();
            rename_all.map_or_else(|| raw.clone(), |rule| rule.apply(&raw))
        });
        fields.push(AttributeField {
            name,
            ident: field_ident,
        });
    }
    Ok(ParsedInput {
        ident,
        attrs,
        fields,
    })
}
