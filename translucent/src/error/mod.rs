//! Error types produced while defining, binding and calling translucent classes.

mod constructors;
mod types;

pub use types::{ArgumentError, TranslucentError};
