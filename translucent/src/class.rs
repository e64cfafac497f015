//! Class definitions, method tables and class specifications.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::TranslucentResult;
use crate::object::Receiver;
use crate::runtime::Runtime;

/// Identifier of a class defined in a [`Runtime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Signature shared by user-written and generated methods.
pub type MethodFn =
    dyn Fn(&mut Runtime, Receiver<'_>, &[Value]) -> TranslucentResult<Value> + Send + Sync;

/// Where a method table entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodOrigin {
    /// Written by hand and registered with the class.
    User,
    /// Produced by the accessor synthesizer.
    Generated,
}

/// A callable entry in a class's method table.
#[derive(Clone)]
pub struct Method {
    origin: MethodOrigin,
    body: Arc<MethodFn>,
}

impl Method {
    /// Wrap a user-written method body.
    #[must_use]
    pub fn user<F>(body: F) -> Self
    where
        F: Fn(&mut Runtime, Receiver<'_>, &[Value]) -> TranslucentResult<Value>
            + Send
            + Sync
            + 'static,
    {
        Self {
            origin: MethodOrigin::User,
            body: Arc::new(body),
        }
    }

    pub(crate) fn generated<F>(body: F) -> Self
    where
        F: Fn(&mut Runtime, Receiver<'_>, &[Value]) -> TranslucentResult<Value>
            + Send
            + Sync
            + 'static,
    {
        Self {
            origin: MethodOrigin::Generated,
            body: Arc::new(body),
        }
    }

    /// Returns where the method came from.
    #[must_use]
    pub const fn origin(&self) -> MethodOrigin {
        self.origin
    }

    pub(crate) fn body(&self) -> Arc<MethodFn> {
        Arc::clone(&self.body)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("origin", &self.origin)
            .field("body", &"<method>")
            .finish()
    }
}

/// Declarative description of a class handed to [`Runtime::define_class`].
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use translucent::{ClassSpec, Receiver, Runtime};
///
/// let mut rt = Runtime::new();
/// let widget = rt
///     .define_class(
///         ClassSpec::new("Shop::Widget")
///             .template(json!({"colour": "red", "Count": 0}))
///             .method("describe", |rt, mut this, _args| {
///                 let colour = rt.call(this.reborrow(), "colour", &[])?;
///                 Ok(json!(format!("a {} widget", colour.as_str().unwrap_or("plain"))))
///             }),
///     )
///     .expect("class defines");
/// let described = rt
///     .call(Receiver::Class(widget), "describe", &[])
///     .expect("describe resolves");
/// assert_eq!(described, json!("a red widget"));
/// ```
#[derive(Debug, Default)]
pub struct ClassSpec {
    pub(crate) name: String,
    pub(crate) parents: Vec<ClassId>,
    pub(crate) methods: BTreeMap<String, Method>,
    pub(crate) class_values: Map<String, Value>,
    pub(crate) template: Option<Value>,
}

impl ClassSpec {
    /// Start a specification for a class named `name` (`::`-separated).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a parent class. Classes without parents inherit the base class.
    #[must_use]
    pub fn parent(mut self, parent: ClassId) -> Self {
        self.parents.push(parent);
        self
    }

    /// Register the attribute template explicitly; the class is bound as
    /// soon as it is defined.
    #[must_use]
    pub fn template(mut self, template: Value) -> Self {
        self.template = Some(template);
        self
    }

    /// Attach a class-level value. A value named after the last path
    /// component of the class name serves as the conventional template.
    #[must_use]
    pub fn class_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.class_values.insert(name.into(), value);
        self
    }

    /// Add a user-written method.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Runtime, Receiver<'_>, &[Value]) -> TranslucentResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.methods.insert(name.into(), Method::user(body));
        self
    }
}

/// A class as stored in the runtime.
#[derive(Debug)]
pub(crate) struct ClassDef {
    pub(crate) name: String,
    pub(crate) parents: Vec<ClassId>,
    pub(crate) methods: BTreeMap<String, Method>,
    pub(crate) class_values: Map<String, Value>,
    pub(crate) registered: Option<Value>,
}

impl ClassDef {
    pub(crate) fn new(name: String, parents: Vec<ClassId>) -> Self {
        Self {
            name,
            parents,
            methods: BTreeMap::new(),
            class_values: Map::new(),
            registered: None,
        }
    }

    /// Last `::` component of the class name.
    pub(crate) fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}

/// Returns `true` when `name` is a usable class name.
pub(crate) fn is_valid_class_name(name: &str) -> bool {
    !name.is_empty() && name.split("::").all(|segment| !segment.trim().is_empty())
}

#[cfg(test)]
mod tests {
    //! Unit tests for class naming helpers.

    use rstest::rstest;

    use super::{ClassDef, ClassId, is_valid_class_name};

    #[rstest]
    #[case("Widget", true)]
    #[case("Shop::Widget", true)]
    #[case("", false)]
    #[case("Shop::", false)]
    #[case("::Widget", false)]
    fn validates_class_names(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_class_name(name), valid);
    }

    #[test]
    fn short_name_is_last_component() {
        let class = ClassDef::new("Shop::Tools::Widget".to_owned(), vec![ClassId::new(0)]);
        assert_eq!(class.short_name(), "Widget");
    }
}
