//! Test helpers shared across the translucent workspace.
//!
//! - [`env`] serialises access to the `TRANSLUCENT_*` option variables.
//! - [`hierarchy`] builds a sample class hierarchy used by integration and
//!   behaviour tests.

pub mod env;
pub mod hierarchy;

pub use hierarchy::Zoo;
