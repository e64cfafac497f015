//! Serde attribute parsing helpers.
//!
//! The template is the serialized default value, so attribute names are the
//! JSON keys serde emits. The derive therefore mirrors serde's field naming:
//! `#[serde(rename = "...")]`, `#[serde(rename_all = "...")]` and the skip
//! attributes.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

/// Supported `#[serde(rename_all = "...")]` rules for struct fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SerdeRenameAll {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl SerdeRenameAll {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new(
                value.span(),
                format!("unsupported serde rename_all value '{other}'"),
            )),
        }
    }

    pub(crate) fn apply(self, field_name: &str) -> String {
        match self {
            Self::Lower => field_name.to_ascii_lowercase(),
            Self::Upper => field_name.to_ascii_uppercase(),
            Self::Pascal => field_name.to_upper_camel_case(),
            Self::Camel => field_name.to_lower_camel_case(),
            Self::Snake => field_name.to_snake_case(),
            Self::ScreamingSnake => field_name.to_shouty_snake_case(),
            Self::Kebab => field_name.to_kebab_case(),
            Self::ScreamingKebab => field_name.to_shouty_kebab_case(),
        }
    }
}

/// Parse `#[serde(rename_all = "...")]` (or its `serialize` half) from
/// struct attributes.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<SerdeRenameAll>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename_all") {
                return super::discard_unknown(&meta);
            }
            if meta.input.peek(Token![=]) {
                let value = meta.value()?.parse::<LitStr>()?;
                out = Some(SerdeRenameAll::parse(&value)?);
                return Ok(());
            }
            meta.parse_nested_meta(|nested| {
                let Some(value) = serialize_half(&nested)? else {
                    return Ok(());
                };
                out = Some(SerdeRenameAll::parse(&value)?);
                Ok(())
            })
        })?;
    }
    Ok(out)
}

/// Parse `#[serde(rename = "...")]` (and `rename(serialize = "...")`) from
/// field attributes.
pub(crate) fn serde_field_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename") {
                return super::discard_unknown(&meta);
            }
            if meta.input.peek(Token![=]) {
                let value = meta.value()?.parse::<LitStr>()?;
                out = Some(value.value());
                return Ok(());
            }
            if !meta.input.peek(syn::token::Paren) {
                return Ok(());
            }
            meta.parse_nested_meta(|nested| {
                if let Some(value) = serialize_half(&nested)? {
                    out = Some(value.value());
                }
                Ok(())
            })
        })?;
    }
    Ok(out)
}

/// Returns `true` when serde never serializes the field.
pub(crate) fn serde_skips(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skipped = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                skipped = true;
                return Ok(());
            }
            super::discard_unknown(&meta)
        })?;
    }
    Ok(skipped)
}

/// Reject `#[serde(skip_serializing_if = "...")]`.
///
/// Such a field would be listed in `ATTRIBUTES` yet vanish from the
/// template whenever its default is skipped, leaving the class without a
/// default or accessors for it.
pub(crate) fn reject_conditional_skip(attrs: &[Attribute]) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip_serializing_if") {
                return Err(meta.error(
                    "`skip_serializing_if` can drop the attribute from the template; \
                     use `skip` or always serialize the field",
                ));
            }
            super::discard_unknown(&meta)
        })?;
    }
    Ok(())
}

fn serialize_half(nested: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if !nested.path.is_ident("serialize") {
        super::discard_unknown(nested)?;
        return Ok(None);
    }
    Ok(Some(nested.value()?.parse::<LitStr>()?))
}
