//! Runtime options and their layered loading.
//!
//! Options start from [`Options::default`] and may be overridden by
//! `TRANSLUCENT_`-prefixed environment variables, for example
//! `TRANSLUCENT_REBIND=extend`.

use std::sync::Arc;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use crate::TranslucentResult;
use crate::error::TranslucentError;

/// What binding does when a class is already bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebindPolicy {
    /// Re-binding is a silent no-op.
    #[default]
    Ignore,
    /// Attributes not yet present are added; existing ones are untouched.
    Extend,
}

/// Behavioural switches for a [`crate::Runtime`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Policy applied when binding a class that already has an entry.
    pub rebind: RebindPolicy,
    /// Log a warning when the base class is constructed directly.
    pub warn_on_base_construct: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rebind: RebindPolicy::Ignore,
            warn_on_base_construct: true,
        }
    }
}

impl Options {
    /// Prefix of the environment variables consulted by [`Self::load`].
    pub const ENV_PREFIX: &'static str = "TRANSLUCENT_";

    /// Defaults overridden by `TRANSLUCENT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`TranslucentError::Options`] when a variable holds a value
    /// that does not deserialize, such as `TRANSLUCENT_REBIND=sometimes`.
    pub fn load() -> TranslucentResult<Self> {
        Self::figment()
            .extract()
            .map_err(|err| Arc::new(TranslucentError::from(err)))
    }

    /// The provider stack used by [`Self::load`], for callers that want to
    /// merge further sources.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(Self::ENV_PREFIX))
    }
}
