//! Translucent attributes for runtime-defined classes.
//!
//! A class declares an attribute template: attribute names mapped to default
//! values. Binding the class stores those defaults in a class-wide entry and
//! generates a family of accessors per attribute. Instances read through to
//! the class-wide value until they write their own, after which the own value
//! shadows it for good.
//!
//! Attribute names carry their own policy. Leading underscores select the
//! access tier (`name` public, `_name` protected, `__name` private), and an
//! uppercase first letter after them selects class scope, which never stores
//! per-instance values.
//!
//! ```rust
//! use serde_json::json;
//! use translucent::{ClassSpec, Receiver, Runtime};
//!
//! let mut rt = Runtime::new();
//! let pet = rt
//!     .define_class(ClassSpec::new("Pet").template(json!({"sound": "..."})))
//!     .expect("class defines");
//! let mut rex = rt.construct(pet, json!(null)).expect("constructs");
//!
//! rt.call(Receiver::Class(pet), "sound", &[json!("woof")]).expect("set default");
//! assert_eq!(rt.call(Receiver::from(&mut rex), "sound", &[]).expect("read"), json!("woof"));
//!
//! rt.call(Receiver::from(&mut rex), "sound", &[json!("grr")]).expect("shadow");
//! rt.call(Receiver::Class(pet), "sound", &[json!("meow")]).expect("set default");
//! assert_eq!(rt.call(Receiver::from(&mut rex), "sound", &[]).expect("read"), json!("grr"));
//! ```

use std::sync::Arc;

use serde::Serialize;

pub use serde_json;
pub use translucent_macros::Translucent;

mod class;
mod error;
pub mod naming;
mod object;
mod options;
mod runtime;
mod synth;
pub mod template;

pub use class::{ClassId, ClassSpec, Method, MethodFn, MethodOrigin};
pub use error::{ArgumentError, TranslucentError};
pub use object::{Object, Receiver};
pub use options::{Options, RebindPolicy};
pub use runtime::{BASE_CLASS, Runtime};
pub use synth::AccessorSite;
pub use template::{AccessTier, Datatype, Role, Scope};

/// Result type used throughout the crate.
pub type TranslucentResult<T> = Result<T, Arc<TranslucentError>>;

/// A class definition produced by `#[derive(Translucent)]`.
///
/// The template is the serialized [`Default`] value of the deriving type.
pub trait ClassTemplate {
    /// Full `::`-separated class name.
    const CLASS_NAME: &'static str;
    /// Attribute names in declaration order.
    const ATTRIBUTES: &'static [&'static str];

    /// The attribute template as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::Serialize`] when the default value cannot
    /// be represented as JSON.
    fn template() -> TranslucentResult<serde_json::Value>;
}

/// Serialize `value` into an attribute template.
///
/// # Errors
///
/// Returns [`TranslucentError::Serialize`] when serialization fails.
pub fn template_of<T: Serialize>(value: &T) -> TranslucentResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|err| Arc::new(TranslucentError::from(err)))
}
