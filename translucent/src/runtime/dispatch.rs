//! Method dispatch with the fallback registry as last resort.

use serde_json::Value;

use super::Runtime;
use crate::TranslucentResult;
use crate::class::{ClassId, Method, MethodOrigin};
use crate::error::TranslucentError;
use crate::object::Receiver;

impl Runtime {
    /// Call `name` on `receiver`.
    ///
    /// Live methods are resolved through the receiver class's resolution
    /// order. When none matches, the fallback registry is searched along the
    /// same order.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::UnknownClass`] for an undefined receiver
    /// class, [`TranslucentError::NoSuchMethod`] when nothing resolves, and
    /// whatever the method itself returns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use translucent::{ClassSpec, Receiver, Runtime};
    ///
    /// let mut rt = Runtime::new();
    /// let shelf = rt
    ///     .define_class(ClassSpec::new("Shelf").template(json!({"Books": []})))
    ///     .expect("class defines");
    /// rt.call(Receiver::Class(shelf), "AppendBooks", &[json!("Dune")])
    ///     .expect("append resolves");
    /// let books = rt.call(Receiver::Class(shelf), "Books", &[]).expect("read");
    /// assert_eq!(books, json!(["Dune"]));
    /// ```
    pub fn call(
        &mut self,
        receiver: Receiver<'_>,
        name: &str,
        args: &[Value],
    ) -> TranslucentResult<Value> {
        let class = receiver.class_id();
        self.class(class)?;
        let (owner, method) = self
            .resolve(class, name)
            .ok_or_else(|| TranslucentError::no_such_method(self.display_name(class), name))?;
        self.invoke(owner, &method, receiver, args)
    }

    /// Call the synthesized accessor `name`, ignoring live methods.
    ///
    /// An overriding method uses this to delegate to the generated
    /// behaviour it replaced.
    ///
    /// # Errors
    ///
    /// As for [`Self::call`], consulting only the fallback registry.
    pub fn call_default(
        &mut self,
        receiver: Receiver<'_>,
        name: &str,
        args: &[Value],
    ) -> TranslucentResult<Value> {
        let class = receiver.class_id();
        self.class(class)?;
        let (owner, method) = self
            .resolve_fallback(class, name)
            .ok_or_else(|| TranslucentError::no_such_method(self.display_name(class), name))?;
        self.invoke(owner, &method, receiver, args)
    }

    /// Returns `true` when `name` resolves on `class`, live or through the
    /// fallback registry.
    #[must_use]
    pub fn responds_to(&self, class: ClassId, name: &str) -> bool {
        self.resolve(class, name).is_some()
    }

    pub(crate) fn resolve(&self, class: ClassId, name: &str) -> Option<(ClassId, Method)> {
        self.resolve_live(class, name)
            .or_else(|| self.resolve_fallback(class, name))
    }

    pub(super) fn resolve_live(&self, class: ClassId, name: &str) -> Option<(ClassId, Method)> {
        self.linearize(class).into_iter().find_map(|id| {
            self.classes
                .get(id.index())
                .and_then(|def| def.methods.get(name))
                .map(|method| (id, method.clone()))
        })
    }

    fn resolve_fallback(&self, class: ClassId, name: &str) -> Option<(ClassId, Method)> {
        self.linearize(class).into_iter().find_map(|id| {
            self.fallbacks
                .get(&(id, name.to_owned()))
                .map(|method| (id, method.clone()))
        })
    }

    fn invoke(
        &mut self,
        owner: ClassId,
        method: &Method,
        receiver: Receiver<'_>,
        args: &[Value],
    ) -> TranslucentResult<Value> {
        let body = method.body();
        match method.origin() {
            MethodOrigin::Generated => body(self, receiver, args),
            MethodOrigin::User => {
                self.frames.push(owner);
                let result = body(self, receiver, args);
                self.frames.pop();
                result
            }
        }
    }
}
