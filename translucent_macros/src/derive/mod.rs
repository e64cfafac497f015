//! Expansion of `#[derive(Translucent)]`.

mod crate_path;
mod generate;
mod parse;

use proc_macro2::TokenStream;

/// Parse `input` and produce the `ClassTemplate` implementation.
pub(crate) fn expand(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse::parse_input(input)?;
    let krate = crate_path::resolve(parsed.attrs.crate_path.as_ref());
    generate::class_template(&parsed, &krate)
}
