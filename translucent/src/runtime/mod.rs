//! The owned class registry every operation runs against.
//!
//! A [`Runtime`] holds the class table, the class registry entries carrying
//! class-wide defaults, the fallback registry of synthesized methods and the
//! call-frame stack used by access checks. Nothing is global: two runtimes
//! never observe each other's classes.

mod binder;
mod dispatch;
mod factory;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::class::{ClassDef, ClassId, ClassSpec, Method, is_valid_class_name};
use crate::error::TranslucentError;
use crate::object::Receiver;
use crate::options::Options;
use crate::synth::AccessorSite;
use crate::template::TemplateRegistry;
use crate::{ClassTemplate, TranslucentResult};

/// Name of the abstract base class every runtime starts with.
pub const BASE_CLASS: &str = "Translucent";

/// Registry of classes, class-wide defaults and synthesized methods.
pub struct Runtime {
    options: Options,
    templates: TemplateRegistry,
    classes: Vec<ClassDef>,
    names: HashMap<String, ClassId>,
    entries: HashMap<ClassId, Map<String, Value>>,
    fallbacks: BTreeMap<(ClassId, String), Method>,
    frames: Vec<ClassId>,
    base: ClassId,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// A runtime with default [`Options`] and only the base class defined.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// A runtime using explicit options.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        let base = ClassId::new(0);
        Self {
            options,
            templates: TemplateRegistry::default(),
            classes: vec![ClassDef::new(BASE_CLASS.to_owned(), Vec::new())],
            names: HashMap::from([(BASE_CLASS.to_owned(), base)]),
            entries: HashMap::new(),
            fallbacks: BTreeMap::new(),
            frames: Vec::new(),
            base,
        }
    }

    /// A runtime whose options come from [`Options::load`].
    ///
    /// # Errors
    ///
    /// Propagates [`TranslucentError::Options`] when the environment holds
    /// an unparseable option.
    pub fn from_env() -> TranslucentResult<Self> {
        Options::load().map(Self::with_options)
    }

    /// Active options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The abstract base class.
    #[must_use]
    pub const fn base(&self) -> ClassId {
        self.base
    }

    /// Fragments used when binding classes.
    #[must_use]
    pub const fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Mutable access to the fragments, for registering custom roles before
    /// classes are bound.
    pub const fn templates_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.templates
    }

    /// Define a class.
    ///
    /// A class without parents inherits the base class. An explicit template
    /// in `spec` is registered and bound before this returns; if binding
    /// fails the class is not defined.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::InvalidClassName`],
    /// [`TranslucentError::DuplicateClass`] or
    /// [`TranslucentError::UnknownClass`] for a bad name or parent, and any
    /// error raised while binding the explicit template.
    pub fn define_class(&mut self, spec: ClassSpec) -> TranslucentResult<ClassId> {
        let ClassSpec {
            name,
            parents,
            methods,
            class_values,
            template,
        } = spec;
        if !is_valid_class_name(&name) {
            return Err(Arc::new(TranslucentError::InvalidClassName { name }));
        }
        if self.names.contains_key(&name) {
            return Err(Arc::new(TranslucentError::DuplicateClass { name }));
        }
        if let Some(missing) = parents.iter().find(|id| self.class(**id).is_err()) {
            return Err(TranslucentError::unknown_class(missing.to_string()));
        }
        let lineage = if parents.is_empty() {
            vec![self.base]
        } else {
            parents
        };

        let id = ClassId::new(self.classes.len());
        let mut def = ClassDef::new(name.clone(), lineage);
        def.methods = methods;
        def.class_values = class_values;
        self.classes.push(def);
        self.names.insert(name.clone(), id);
        tracing::debug!(class = %name, id = %id, "defined class");

        if let Some(explicit) = template
            && let Err(err) = self.register(id, explicit)
        {
            self.classes.pop();
            self.names.remove(&name);
            return Err(err);
        }
        Ok(id)
    }

    /// Define a class from a type deriving [`crate::Translucent`].
    ///
    /// # Errors
    ///
    /// As for [`Self::define_class`], plus serialization failures of the
    /// template.
    pub fn define_template<T: ClassTemplate>(
        &mut self,
        parents: &[ClassId],
    ) -> TranslucentResult<ClassId> {
        let spec = parents
            .iter()
            .fold(ClassSpec::new(T::CLASS_NAME), |spec, parent| spec.parent(*parent))
            .template(T::template()?);
        self.define_class(spec)
    }

    /// Add or replace a user-written method on `class`.
    ///
    /// Replacing a generated accessor keeps the generated version reachable
    /// through [`Self::call_default`].
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::UnknownClass`] when `class` is undefined.
    pub fn define_method<F>(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        body: F,
    ) -> TranslucentResult<()>
    where
        F: Fn(&mut Self, Receiver<'_>, &[Value]) -> TranslucentResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.class_mut(class)?
            .methods
            .insert(name.into(), Method::user(body));
        Ok(())
    }

    /// Remove a live method from `class`'s own table.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::UnknownClass`] when `class` is undefined.
    pub fn remove_method(&mut self, class: ClassId, name: &str) -> TranslucentResult<Option<Method>> {
        Ok(self.class_mut(class)?.methods.remove(name))
    }

    /// Returns `true` when a live method named `name` is visible on `class`,
    /// either defined there or inherited.
    #[must_use]
    pub fn can(&self, class: ClassId, name: &str) -> bool {
        self.resolve_live(class, name).is_some()
    }

    /// Returns `true` when `class` is `ancestor` or inherits from it.
    #[must_use]
    pub fn isa(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.linearize(class).contains(&ancestor)
    }

    /// Method resolution order of `class`: the class itself, then its
    /// ancestors depth-first and left to right, each listed once.
    ///
    /// Unknown identifiers yield an empty order.
    #[must_use]
    pub fn linearize(&self, class: ClassId) -> Vec<ClassId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![class];
        while let Some(id) = pending.pop() {
            let Ok(def) = self.class(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            pending.extend(def.parents.iter().rev().copied());
        }
        order
    }

    /// Look up a class by its full name.
    #[must_use]
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    /// Full name of `class`.
    #[must_use]
    pub fn class_name(&self, class: ClassId) -> Option<&str> {
        self.classes.get(class.index()).map(|def| def.name.as_str())
    }

    /// Returns `true` once `class` has a class registry entry.
    #[must_use]
    pub fn is_bound(&self, class: ClassId) -> bool {
        self.entries.contains_key(&class)
    }

    /// Current class-wide value of `attribute` as seen from `class`.
    #[must_use]
    pub fn class_default(&self, class: ClassId, attribute: &str) -> Option<&Value> {
        self.linearize(class)
            .into_iter()
            .find_map(|id| self.entries.get(&id)?.get(attribute))
    }

    /// Calling class of the innermost frame, if any.
    #[must_use]
    pub fn caller(&self) -> Option<ClassId> {
        self.frames.last().copied()
    }

    /// Run `body` as code executing within `class`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::UnknownClass`] when `class` is undefined,
    /// otherwise whatever `body` returns.
    pub fn within<T, F>(&mut self, class: ClassId, body: F) -> TranslucentResult<T>
    where
        F: FnOnce(&mut Self) -> TranslucentResult<T>,
    {
        self.class(class)?;
        self.frames.push(class);
        let result = body(self);
        self.frames.pop();
        result
    }

    pub(crate) fn class(&self, class: ClassId) -> TranslucentResult<&ClassDef> {
        self.classes
            .get(class.index())
            .ok_or_else(|| TranslucentError::unknown_class(class.to_string()))
    }

    fn class_mut(&mut self, class: ClassId) -> TranslucentResult<&mut ClassDef> {
        self.classes
            .get_mut(class.index())
            .ok_or_else(|| TranslucentError::unknown_class(class.to_string()))
    }

    fn display_name(&self, class: ClassId) -> String {
        self.class_name(class)
            .map_or_else(|| class.to_string(), ToOwned::to_owned)
    }

    /// Class registry slot for the accessor at `site` as seen from `class`.
    ///
    /// The nearest class in `class`'s resolution order whose entry declares
    /// the attribute wins; the declaring class is used otherwise.
    pub(crate) fn class_slot_mut(
        &mut self,
        class: ClassId,
        site: &AccessorSite,
    ) -> &mut Value {
        let owner = self
            .linearize(class)
            .into_iter()
            .find(|id| {
                self.entries
                    .get(id)
                    .is_some_and(|entry| entry.contains_key(site.attribute()))
            })
            .unwrap_or_else(|| site.class());
        self.entries
            .entry(owner)
            .or_default()
            .entry(site.attribute())
            .or_insert(Value::Null)
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes: Vec<&str> = self.classes.iter().map(|def| def.name.as_str()).collect();
        f.debug_struct("Runtime")
            .field("options", &self.options)
            .field("classes", &classes)
            .field("bound", &self.entries.len())
            .field("fallbacks", &self.fallbacks.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
