//! Template registry: the reusable fragments accessors are composed from.
//!
//! Three dimensions feed every accessor. The access tier selects an
//! [`AccessCheck`], the scope selects a [`ScopePolicy`], and the datatype of
//! the attribute's default selects a [`RoleSet`] of behaviours. Datatype
//! roles override default roles sharing the same prototype.
//!
//! # Example
//!
//! ```rust
//! use translucent::template::{Datatype, TemplateRegistry};
//!
//! let registry = TemplateRegistry::default();
//! let roles = registry.roles(Some(Datatype::List));
//! assert!(roles.get("appendAttribute").is_some());
//! assert!(roles.get("attribute").is_some());
//! assert!(registry.roles_for_tag("tuple").is_none());
//! ```

mod policy;
mod roles;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ArgumentError;

pub use policy::{AccessCheck, AccessTier, Scope, ScopePolicy};
pub(crate) use policy::{
    class_scope, instance_scope, private_check, protected_check, public_check,
};

/// Behaviour fragment operating on the slot chosen by the scope policy.
pub type Behavior =
    Arc<dyn Fn(&mut Value, &[Value]) -> Result<Value, ArgumentError> + Send + Sync>;

/// Shape of an attribute, derived from its default value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Datatype {
    /// Anything that is neither a list nor a map, including `null`.
    Scalar,
    /// JSON arrays.
    List,
    /// JSON objects.
    Map,
}

impl Datatype {
    /// Classify a default value.
    ///
    /// # Examples
    ///
    /// ```
    /// use translucent::template::Datatype;
    /// use serde_json::json;
    /// assert_eq!(Datatype::of(&json!([1])), Datatype::List);
    /// assert_eq!(Datatype::of(&json!({"a": 1})), Datatype::Map);
    /// assert_eq!(Datatype::of(&json!(null)), Datatype::Scalar);
    /// ```
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Map,
            _ => Self::Scalar,
        }
    }

    /// Parse a textual datatype tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "scalar" => Some(Self::Scalar),
            "list" => Some(Self::List),
            "map" => Some(Self::Map),
            _ => None,
        }
    }
}

/// A named behaviour template such as `appendAttribute`.
#[derive(Clone)]
pub struct Role {
    prototype: String,
    behavior: Behavior,
}

impl Role {
    /// Create a role from a prototype name and a behaviour closure.
    ///
    /// The prototype must contain the placeholder word `attribute` or
    /// `Attribute`; this is checked when a class is bound.
    pub fn new<F>(prototype: impl Into<String>, behavior: F) -> Self
    where
        F: Fn(&mut Value, &[Value]) -> Result<Value, ArgumentError> + Send + Sync + 'static,
    {
        Self {
            prototype: prototype.into(),
            behavior: Arc::new(behavior),
        }
    }

    /// Returns the prototype name.
    #[must_use]
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// Returns a shared handle to the behaviour.
    #[must_use]
    pub fn behavior(&self) -> Behavior {
        Arc::clone(&self.behavior)
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("prototype", &self.prototype)
            .field("behavior", &"<behavior>")
            .finish()
    }
}

/// Roles keyed by prototype, in deterministic order.
#[derive(Clone, Debug, Default)]
pub struct RoleSet {
    roles: BTreeMap<String, Role>,
}

impl RoleSet {
    /// Insert `role`, replacing any role with the same prototype.
    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role.prototype.clone(), role);
    }

    /// Look up a role by prototype.
    #[must_use]
    pub fn get(&self, prototype: &str) -> Option<&Role> {
        self.roles.get(prototype)
    }

    /// Iterate over the roles in prototype order.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    /// Number of roles in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns `true` when the set holds no roles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    fn overlay(&mut self, other: &Self) {
        for role in other.iter() {
            self.insert(role.clone());
        }
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::default();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

/// Holds every fragment the accessor synthesizer composes.
#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    defaults: RoleSet,
    by_datatype: BTreeMap<Datatype, RoleSet>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        let defaults = RoleSet::from_iter([Role::new("attribute", roles::scalar_accessor)]);
        let list = RoleSet::from_iter([
            Role::new("attribute", roles::list_accessor),
            Role::new("appendAttribute", roles::list_append),
            Role::new("removeLastAttribute", roles::list_remove_last),
            Role::new("removeFirstAttribute", roles::list_remove_first),
            Role::new("prependAttribute", roles::list_prepend),
            Role::new("spliceAttribute", roles::list_splice),
            Role::new("sliceAttribute", roles::list_slice),
        ]);
        let map = RoleSet::from_iter([
            Role::new("attribute", roles::map_accessor),
            Role::new("deleteAttribute", roles::map_delete),
            Role::new("setAttribute", roles::map_set),
            Role::new("getAttribute", roles::map_get),
        ]);
        Self {
            defaults,
            by_datatype: BTreeMap::from([
                (Datatype::Scalar, RoleSet::default()),
                (Datatype::List, list),
                (Datatype::Map, map),
            ]),
        }
    }
}

impl TemplateRegistry {
    /// Access-check fragment for `tier`.
    #[must_use]
    pub fn access_check(&self, tier: AccessTier) -> AccessCheck {
        match tier {
            AccessTier::Public => public_check,
            AccessTier::Protected => protected_check,
            AccessTier::Private => private_check,
        }
    }

    /// Scope fragment for `scope`.
    #[must_use]
    pub fn scope_policy(&self, scope: Scope) -> ScopePolicy {
        match scope {
            Scope::Class => class_scope,
            Scope::Instance => instance_scope,
        }
    }

    /// Default roles merged with the roles of `datatype`.
    ///
    /// `None` yields the default roles alone.
    #[must_use]
    pub fn roles(&self, datatype: Option<Datatype>) -> RoleSet {
        let mut merged = self.defaults.clone();
        if let Some(specific) = datatype.and_then(|tag| self.by_datatype.get(&tag)) {
            merged.overlay(specific);
        }
        merged
    }

    /// Like [`Self::roles`] but keyed by a textual tag.
    ///
    /// `"default"` selects the default roles; unknown tags yield `None`.
    #[must_use]
    pub fn roles_for_tag(&self, tag: &str) -> Option<RoleSet> {
        if tag == "default" {
            return Some(self.roles(None));
        }
        Datatype::from_tag(tag).map(|datatype| self.roles(Some(datatype)))
    }

    /// Register a custom role for `datatype`, or for every attribute when
    /// `datatype` is `None`.
    pub fn register_role(&mut self, datatype: Option<Datatype>, role: Role) {
        match datatype {
            Some(tag) => self.by_datatype.entry(tag).or_default().insert(role),
            None => self.defaults.insert(role),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for role merging and lookup.

    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{Datatype, Role, TemplateRegistry};

    #[rstest]
    #[case::default(None, 1)]
    #[case::scalar(Some(Datatype::Scalar), 1)]
    #[case::list(Some(Datatype::List), 7)]
    #[case::map(Some(Datatype::Map), 4)]
    fn merged_role_counts(#[case] datatype: Option<Datatype>, #[case] expected: usize) {
        assert_eq!(TemplateRegistry::default().roles(datatype).len(), expected);
    }

    #[test]
    fn datatype_roles_override_defaults() {
        let registry = TemplateRegistry::default();
        let roles = registry.roles(Some(Datatype::List));
        let accessor = roles.get("attribute").expect("list accessor").behavior();
        let mut slot = json!([]);
        let stored = accessor(&mut slot, &[json!("only")]).expect("set list");
        assert_eq!(stored, json!(["only"]));
    }

    #[rstest]
    #[case("default", true)]
    #[case("scalar", true)]
    #[case("list", true)]
    #[case("map", true)]
    #[case("tuple", false)]
    fn tag_lookup(#[case] tag: &str, #[case] known: bool) {
        assert_eq!(TemplateRegistry::default().roles_for_tag(tag).is_some(), known);
    }

    #[test]
    fn custom_roles_join_their_datatype() {
        let mut registry = TemplateRegistry::default();
        registry.register_role(
            Some(Datatype::List),
            Role::new("countAttribute", |slot: &mut Value, _args: &[Value]| {
                Ok(Value::from(slot.as_array().map_or(0, Vec::len)))
            }),
        );
        assert!(registry.roles(Some(Datatype::List)).get("countAttribute").is_some());
        assert!(registry.roles(Some(Datatype::Map)).get("countAttribute").is_none());
    }
}
