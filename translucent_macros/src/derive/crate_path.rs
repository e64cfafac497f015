//! Path under which generated code reaches the `translucent` runtime.
//!
//! The `ClassTemplate` impl names `ClassTemplate`, `TranslucentResult`,
//! `template_of` and the re-exported `serde_json` through this path. A
//! crate that only depends on a facade re-exporting `translucent` sets
//! `#[translucent(crate = "facade::objects")]`; everyone else gets
//! `::translucent`.

use proc_macro2::TokenStream;
use quote::quote;

/// Tokens naming the runtime crate in generated items.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::translucent }, |path| quote! { #path })
}
