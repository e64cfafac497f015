//! Binding: turning an attribute template into class defaults and accessors.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::Runtime;
use crate::TranslucentResult;
use crate::class::ClassId;
use crate::error::TranslucentError;
use crate::naming::{is_method_identifier, split_attribute};
use crate::options::RebindPolicy;
use crate::synth::{AccessorPlan, synthesize};
use crate::template::Datatype;

impl Runtime {
    /// Bind `template` and record it as the class's explicit template.
    ///
    /// The template is recorded only when binding succeeds and takes effect;
    /// a re-registration ignored under [`RebindPolicy::Ignore`] leaves the
    /// previously recorded template in place.
    ///
    /// # Errors
    ///
    /// As for [`Self::bind`].
    pub fn register(&mut self, class: ClassId, template: Value) -> TranslucentResult<usize> {
        let was_bound = self.is_bound(class);
        let installed = self.bind(class, Some(template.clone()))?;
        if !was_bound || self.options.rebind == RebindPolicy::Extend {
            self.class_mut(class)?.registered = Some(template);
        }
        Ok(installed)
    }

    /// Bind `class`, generating its accessors.
    ///
    /// Without an explicit template the registered template is used, then a
    /// class value named after the last component of the class name. A class
    /// with neither binds nothing. Every synthesized method lands in the
    /// fallback registry; only those whose name is not already visible on
    /// the class are installed. Returns the number installed.
    ///
    /// Binding an already bound class follows [`crate::RebindPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::MalformedTemplate`] for a template that is
    /// not a JSON object, declares an unusable attribute name, or whose
    /// attributes derive the same method name twice, and
    /// [`TranslucentError::InvalidTemplate`] when a role cannot be composed.
    /// Nothing is stored when an error is returned.
    pub fn bind(&mut self, class: ClassId, template: Option<Value>) -> TranslucentResult<usize> {
        let name = self.class(class)?.name.clone();
        let Some(template) = template.or_else(|| self.discover_template(class)) else {
            debug!(class = %name, "no attribute template; nothing to bind");
            return Ok(0);
        };
        let Value::Object(declared) = template else {
            return Err(TranslucentError::malformed_template(
                name,
                "expected a JSON object mapping attribute names to defaults",
            ));
        };
        if let Some(bad) = declared.keys().find(|key| !is_attribute_name(key)) {
            return Err(TranslucentError::malformed_template(
                name,
                format!("'{bad}' is not a valid attribute name"),
            ));
        }

        let fresh = match (self.entries.get(&class), self.options.rebind) {
            (None, _) => declared,
            (Some(_), RebindPolicy::Ignore) => {
                debug!(class = %name, "class already bound; ignoring");
                return Ok(0);
            }
            (Some(existing), RebindPolicy::Extend) => declared
                .into_iter()
                .filter(|(attribute, _)| !existing.contains_key(attribute))
                .collect(),
        };

        let plans = self.plan(class, &name, &fresh)?;
        self.commit(class, fresh, plans)
    }

    fn discover_template(&self, class: ClassId) -> Option<Value> {
        let def = self.class(class).ok()?;
        def.registered
            .clone()
            .or_else(|| def.class_values.get(def.short_name()).cloned())
    }

    fn plan(
        &self,
        class: ClassId,
        name: &str,
        attributes: &Map<String, Value>,
    ) -> TranslucentResult<Vec<AccessorPlan>> {
        let mut plans = Vec::new();
        let mut claimed: BTreeMap<String, &str> = BTreeMap::new();
        for (attribute, default) in attributes {
            let roles = self.templates.roles(Some(Datatype::of(default)));
            for role in roles.iter() {
                let plan = synthesize(&self.templates, class, name, attribute, role)?;
                let method = plan.site.method();
                if let Some(previous) = claimed.insert(method.to_owned(), attribute) {
                    return Err(TranslucentError::malformed_template(
                        name,
                        format!("attributes '{previous}' and '{attribute}' both generate '{method}'"),
                    ));
                }
                if self.fallbacks.contains_key(&(class, method.to_owned())) {
                    return Err(TranslucentError::malformed_template(
                        name,
                        format!("'{attribute}' generates '{method}', which is already generated"),
                    ));
                }
                plans.push(plan);
            }
        }
        Ok(plans)
    }

    fn commit(
        &mut self,
        class: ClassId,
        attributes: Map<String, Value>,
        plans: Vec<AccessorPlan>,
    ) -> TranslucentResult<usize> {
        self.entries.entry(class).or_default().extend(attributes);
        let mut installed = 0;
        for AccessorPlan { site, method } in plans {
            self.fallbacks
                .insert((class, site.method().to_owned()), method.clone());
            if self.can(class, site.method()) {
                debug!(
                    class = %site.class_name(),
                    method = %site.method(),
                    "method already visible; generated accessor kept as fallback"
                );
                continue;
            }
            self.class_mut(class)?
                .methods
                .insert(site.method().to_owned(), method);
            installed += 1;
        }
        debug!(class = %self.display_name(class), installed, "bound class");
        Ok(installed)
    }
}

fn is_attribute_name(attribute: &str) -> bool {
    !split_attribute(attribute).1.is_empty() && is_method_identifier(attribute)
}

#[cfg(test)]
mod tests {
    //! Unit tests for binding decisions.

    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::class::ClassSpec;
    use crate::error::TranslucentError;
    use crate::options::{Options, RebindPolicy};
    use crate::runtime::Runtime;

    #[rstest]
    #[case::scalar(json!({"name": null}), 1)]
    #[case::list(json!({"items": []}), 7)]
    #[case::map(json!({"index": {}}), 4)]
    #[case::mixed(json!({"name": "x", "items": [], "index": {}}), 12)]
    fn installs_one_method_per_role(#[case] template: Value, #[case] expected: usize) {
        let mut rt = Runtime::new();
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        assert_eq!(rt.register(class, template).expect("bind"), expected);
        assert!(rt.is_bound(class));
    }

    #[test]
    fn rebinding_is_ignored_by_default() {
        let mut rt = Runtime::new();
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        rt.register(class, json!({"name": "first"})).expect("bind");
        assert_eq!(rt.bind(class, Some(json!({"other": 1}))).expect("rebind"), 0);
        assert!(!rt.can(class, "other"));
        assert_eq!(rt.class_default(class, "name"), Some(&json!("first")));
    }

    #[test]
    fn extend_policy_adds_only_new_attributes() {
        let mut rt = Runtime::with_options(Options {
            rebind: RebindPolicy::Extend,
            ..Options::default()
        });
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        rt.register(class, json!({"name": "first"})).expect("bind");
        let installed = rt
            .bind(class, Some(json!({"name": "second", "other": 1})))
            .expect("extend");
        assert_eq!(installed, 1);
        assert!(rt.can(class, "other"));
        assert_eq!(rt.class_default(class, "name"), Some(&json!("first")));
    }

    #[test]
    fn conventional_class_value_is_discovered() {
        let mut rt = Runtime::new();
        let class = rt
            .define_class(ClassSpec::new("Shop::Widget").class_value("Widget", json!({"size": 3})))
            .expect("class");
        assert!(!rt.is_bound(class));
        assert_eq!(rt.bind(class, None).expect("bind"), 1);
        assert_eq!(rt.class_default(class, "size"), Some(&json!(3)));
    }

    #[test]
    fn missing_template_binds_nothing() {
        let mut rt = Runtime::new();
        let class = rt.define_class(ClassSpec::new("Plain")).expect("class");
        assert_eq!(rt.bind(class, None).expect("bind"), 0);
        assert!(!rt.is_bound(class));
    }

    #[rstest]
    #[case::not_object(json!("name"))]
    #[case::bad_name(json!({"two words": 1}))]
    #[case::only_underscores(json!({"__": 1}))]
    fn malformed_templates_store_nothing(#[case] template: Value) {
        let mut rt = Runtime::new();
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        let err = rt.register(class, template).expect_err("rejected");
        assert!(matches!(&*err, TranslucentError::MalformedTemplate { .. }));
        assert!(!rt.is_bound(class));
    }

    #[test]
    fn failed_registration_keeps_the_class_value_reachable() {
        let mut rt = Runtime::new();
        let class = rt
            .define_class(ClassSpec::new("Shop::Widget").class_value("Widget", json!({"size": 3})))
            .expect("class");
        rt.register(class, json!("bad")).expect_err("rejected");
        assert!(rt.class(class).expect("defined").registered.is_none());
        rt.construct(class, Value::Null).expect("binds from the class value");
        assert_eq!(rt.class_default(class, "size"), Some(&json!(3)));
    }

    #[test]
    fn ignored_registration_keeps_the_recorded_template() {
        let mut rt = Runtime::new();
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        rt.register(class, json!({"name": "first"})).expect("bind");
        assert_eq!(rt.register(class, json!({"other": 1})).expect("ignored"), 0);
        assert_eq!(
            rt.class(class).expect("defined").registered,
            Some(json!({"name": "first"}))
        );
    }

    #[rstest]
    #[case::map_getter(json!({"x": {"k": 1}, "getx": "scalar"}))]
    #[case::list_appender(json!({"list": [], "appendlist": 0}))]
    fn clashing_method_names_are_rejected(#[case] template: Value) {
        let mut rt = Runtime::new();
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        let err = rt.register(class, template).expect_err("rejected");
        assert!(
            matches!(&*err, TranslucentError::MalformedTemplate { message, .. } if message.contains("both generate")),
            "unexpected error: {err}"
        );
        assert!(!rt.is_bound(class));
        assert!(!rt.responds_to(class, "getx"));
        assert!(!rt.responds_to(class, "appendlist"));
    }

    #[test]
    fn extension_cannot_reuse_a_generated_name() {
        let mut rt = Runtime::with_options(Options {
            rebind: RebindPolicy::Extend,
            ..Options::default()
        });
        let class = rt.define_class(ClassSpec::new("Sample")).expect("class");
        rt.register(class, json!({"x": {}})).expect("bind");
        let err = rt
            .bind(class, Some(json!({"getx": 1})))
            .expect_err("rejected");
        assert!(matches!(&*err, TranslucentError::MalformedTemplate { .. }));
        assert!(rt.class_default(class, "getx").is_none());
        assert_eq!(
            rt.call_default(crate::Receiver::Class(class), "getx", &[json!("k")])
                .expect("map getter"),
            json!([null])
        );
    }
}
