//! Procedural macros for `translucent`.
//!
//! `#[derive(Translucent)]` turns a `Default + Serialize` struct into an
//! attribute template. The serialized default value becomes the template, so
//! the field types fix each attribute's datatype: `Vec` fields bind list
//! roles, map fields bind map roles and everything else binds scalar roles.
//!
//! ```rust,ignore
//! #[derive(Default, serde::Serialize, translucent::Translucent)]
//! #[translucent(class = "Zoo::Animal")]
//! struct Animal {
//!     sound: String,
//!     #[serde(rename = "Legs")]
//!     legs: u8,
//!     tricks: Vec<String>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `translucent::ClassTemplate` for a struct with named fields.
///
/// Struct attributes:
/// - `#[translucent(class = "A::B")]` sets the class name; the struct name is
///   used otherwise.
/// - `#[translucent(crate = "path")]` names the `translucent` crate when it
///   is re-exported or renamed.
///
/// Attribute names follow serde's field naming, including `rename`,
/// `rename_all` and `skip`.
#[proc_macro_derive(Translucent, attributes(translucent))]
pub fn derive_translucent(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
