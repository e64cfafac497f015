//! Accessor synthesis: composing access check, scope and behaviour.
//!
//! An accessor is assembled in a fixed order. The receiver is captured, the
//! tier's access check runs, the scope policy picks the storage slot, and the
//! role's behaviour operates on that slot. The declaring class and attribute
//! name are captured once in an [`AccessorSite`] so every fragment sees the
//! same literals.

use std::sync::Arc;

use crate::TranslucentResult;
use crate::class::{ClassId, Method};
use crate::error::TranslucentError;
use crate::naming::{has_placeholder, is_method_identifier, method_name, split_attribute};
use crate::template::{AccessTier, Role, Scope, TemplateRegistry};

/// The literals an accessor is specialised for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessorSite {
    class: ClassId,
    class_name: String,
    attribute: String,
    method: String,
    tier: AccessTier,
    scope: Scope,
}

impl AccessorSite {
    /// Declaring class.
    #[must_use]
    pub const fn class(&self) -> ClassId {
        self.class
    }

    /// Name of the declaring class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Attribute the accessor operates on.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Derived method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Access tier implied by the attribute name.
    #[must_use]
    pub const fn tier(&self) -> AccessTier {
        self.tier
    }

    /// Scope implied by the attribute name.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }
}

/// A synthesized accessor waiting to be installed.
#[derive(Clone, Debug)]
pub(crate) struct AccessorPlan {
    pub(crate) site: AccessorSite,
    pub(crate) method: Method,
}

/// Compose the accessor for `attribute` under `role`, bound to `class`.
///
/// # Errors
///
/// Returns [`TranslucentError::InvalidTemplate`] when the attribute has no
/// letters, the prototype lacks the placeholder, or the derived name is not a
/// valid method identifier.
pub(crate) fn synthesize(
    templates: &TemplateRegistry,
    class: ClassId,
    class_name: &str,
    attribute: &str,
    role: &Role,
) -> TranslucentResult<AccessorPlan> {
    let invalid = |message: &str| {
        Arc::new(TranslucentError::InvalidTemplate {
            class: class_name.to_owned(),
            attribute: attribute.to_owned(),
            prototype: role.prototype().to_owned(),
            message: message.to_owned(),
        })
    };
    if split_attribute(attribute).1.is_empty() {
        return Err(invalid("attribute name has no letters after its underscores"));
    }
    if !has_placeholder(role.prototype()) {
        return Err(invalid("prototype lacks the `attribute` placeholder"));
    }
    let method = method_name(attribute, role.prototype());
    if !is_method_identifier(&method) {
        return Err(invalid(&format!("derived name '{method}' is not an identifier")));
    }

    let tier = AccessTier::of(attribute);
    let scope = Scope::of(attribute);
    let site = AccessorSite {
        class,
        class_name: class_name.to_owned(),
        attribute: attribute.to_owned(),
        method,
        tier,
        scope,
    };
    let check = templates.access_check(tier);
    let select = templates.scope_policy(scope);
    let behavior = role.behavior();
    let captured = site.clone();
    let generated = Method::generated(move |rt, mut receiver, args| {
        check(rt, &captured)?;
        let slot = select(rt, &mut receiver, &captured, !args.is_empty())?;
        behavior(slot, args).map_err(|source| {
            Arc::new(TranslucentError::BadArguments {
                class: captured.class_name.clone(),
                method: captured.method.clone(),
                source,
            })
        })
    });
    Ok(AccessorPlan {
        site,
        method: generated,
    })
}
