//! Object construction.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use super::Runtime;
use crate::TranslucentResult;
use crate::class::ClassId;
use crate::error::{ArgumentError, TranslucentError};
use crate::object::{Object, Receiver};

impl Runtime {
    /// Construct an object of `class`.
    ///
    /// Unbound classes in the resolution order are bound first, ancestors
    /// before descendants. Each key of `initial` names a method that is
    /// called with the value as its only argument, from within `class`, so
    /// protected and private accessors may be initialised too.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::UnknownAttribute`] for a key naming no
    /// method, [`TranslucentError::BadArguments`] when `initial` is neither
    /// an object nor `null`, and any binding or accessor error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use translucent::{ClassSpec, Receiver, Runtime};
    ///
    /// let mut rt = Runtime::new();
    /// let pet = rt
    ///     .define_class(ClassSpec::new("Pet").template(json!({"name": "unnamed"})))
    ///     .expect("class defines");
    /// let mut rex = rt.construct(pet, json!({"name": "Rex"})).expect("constructs");
    /// let name = rt.call(Receiver::from(&mut rex), "name", &[]).expect("read");
    /// assert_eq!(name, json!("Rex"));
    /// ```
    pub fn construct(&mut self, class: ClassId, initial: Value) -> TranslucentResult<Object> {
        let name = self.class(class)?.name.clone();
        if class == self.base && self.options.warn_on_base_construct {
            warn!(class = %name, "constructing the abstract base class directly");
        }
        let values = match initial {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(Arc::new(TranslucentError::BadArguments {
                    class: name,
                    method: "construct".to_owned(),
                    source: ArgumentError::new(format!(
                        "initial values must be an object, got {other}"
                    )),
                }));
            }
        };

        for ancestor in self.ancestors_first(class) {
            if !self.is_bound(ancestor) {
                self.bind(ancestor, None)?;
            }
        }

        let mut object = Object::new(class);
        self.within(class, |rt| {
            for (attribute, value) in values {
                if rt.resolve(class, &attribute).is_none() {
                    return Err(Arc::new(TranslucentError::UnknownAttribute {
                        class: name.clone(),
                        attribute,
                    }));
                }
                rt.call(Receiver::Instance(&mut object), &attribute, &[value])?;
            }
            Ok(())
        })?;
        Ok(object)
    }

    /// `class` and its ancestors, every class after all of its parents.
    fn ancestors_first(&self, class: ClassId) -> Vec<ClassId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![(class, false)];
        while let Some((id, expanded)) = pending.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !seen.insert(id) {
                continue;
            }
            pending.push((id, true));
            if let Ok(def) = self.class(id) {
                pending.extend(def.parents.iter().rev().map(|parent| (*parent, false)));
            }
        }
        order
    }
}
