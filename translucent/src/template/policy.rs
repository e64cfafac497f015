//! Access-tier and scope policies composed into every accessor.
//!
//! Both dimensions are derived from the attribute name alone: the number of
//! leading underscores selects the tier, the case of the first letter after
//! them selects the scope.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::TranslucentResult;
use crate::class::ClassId;
use crate::error::TranslucentError;
use crate::naming::split_attribute;
use crate::object::Receiver;
use crate::runtime::Runtime;
use crate::synth::AccessorSite;

/// Visibility of a generated accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessTier {
    /// Callable from anywhere.
    Public,
    /// Callable from the declaring class or its subclasses.
    Protected,
    /// Callable only from the declaring class.
    Private,
}

impl AccessTier {
    /// Derive the tier from the leading underscores of `attribute`.
    ///
    /// # Examples
    ///
    /// ```
    /// use translucent::AccessTier;
    /// assert_eq!(AccessTier::of("name"), AccessTier::Public);
    /// assert_eq!(AccessTier::of("_name"), AccessTier::Protected);
    /// assert_eq!(AccessTier::of("__name"), AccessTier::Private);
    /// ```
    #[must_use]
    pub fn of(attribute: &str) -> Self {
        match split_attribute(attribute).0 {
            0 => Self::Public,
            1 => Self::Protected,
            _ => Self::Private,
        }
    }

    /// Lowercase name of the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage scope of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// Always reads and writes the class-wide value.
    Class,
    /// Translucent: instances shadow the class value once they write it.
    Instance,
}

impl Scope {
    /// Derive the scope from the case of the first letter of `attribute`.
    ///
    /// # Examples
    ///
    /// ```
    /// use translucent::Scope;
    /// assert_eq!(Scope::of("_Count"), Scope::Class);
    /// assert_eq!(Scope::of("count"), Scope::Instance);
    /// ```
    #[must_use]
    pub fn of(attribute: &str) -> Self {
        if split_attribute(attribute)
            .1
            .starts_with(|c: char| c.is_uppercase())
        {
            Self::Class
        } else {
            Self::Instance
        }
    }
}

/// Access-check fragment run before any storage is touched.
pub type AccessCheck = fn(&Runtime, &AccessorSite) -> TranslucentResult<()>;

/// Scope fragment selecting the storage slot an accessor operates on.
///
/// The final flag reports whether the call supplied arguments.
pub type ScopePolicy = for<'r> fn(
    &'r mut Runtime,
    &'r mut Receiver<'_>,
    &AccessorSite,
    bool,
) -> TranslucentResult<&'r mut Value>;

pub(crate) const fn public_check(_rt: &Runtime, _site: &AccessorSite) -> TranslucentResult<()> {
    Ok(())
}

pub(crate) fn protected_check(rt: &Runtime, site: &AccessorSite) -> TranslucentResult<()> {
    match rt.caller() {
        Some(caller) if rt.isa(caller, site.class()) => Ok(()),
        caller => Err(violation(rt, site, AccessTier::Protected, caller)),
    }
}

pub(crate) fn private_check(rt: &Runtime, site: &AccessorSite) -> TranslucentResult<()> {
    match rt.caller() {
        Some(caller) if caller == site.class() => Ok(()),
        caller => Err(violation(rt, site, AccessTier::Private, caller)),
    }
}

fn violation(
    rt: &Runtime,
    site: &AccessorSite,
    tier: AccessTier,
    caller: Option<ClassId>,
) -> Arc<TranslucentError> {
    let caller = caller.map_or_else(
        || "outside any class".to_owned(),
        |id| format!("class '{}'", rt.class_name(id).unwrap_or("<unknown>")),
    );
    Arc::new(TranslucentError::AccessViolation {
        class: site.class_name().to_owned(),
        method: site.method().to_owned(),
        tier,
        caller,
    })
}

pub(crate) fn class_scope<'r>(
    rt: &'r mut Runtime,
    receiver: &'r mut Receiver<'_>,
    site: &AccessorSite,
    _has_args: bool,
) -> TranslucentResult<&'r mut Value> {
    let class = receiver.class_id();
    Ok(rt.class_slot_mut(class, site))
}

pub(crate) fn instance_scope<'r>(
    rt: &'r mut Runtime,
    receiver: &'r mut Receiver<'_>,
    site: &AccessorSite,
    has_args: bool,
) -> TranslucentResult<&'r mut Value> {
    let class = receiver.class_id();
    let Receiver::Instance(object) = receiver else {
        return Ok(rt.class_slot_mut(class, site));
    };
    if has_args && !object.has_own(site.attribute()) {
        let current = rt.class_slot_mut(class, site).clone();
        object.store(site.attribute(), current);
    }
    if let Some(slot) = object.own_slot_mut(site.attribute()) {
        return Ok(slot);
    }
    Ok(rt.class_slot_mut(class, site))
}
