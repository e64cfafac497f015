//! Primary error enum for class definition, binding and dispatch.

use thiserror::Error;

use crate::template::AccessTier;

/// Errors raised by the translucent runtime.
///
/// Every variant describes a usage or programmer error: the failing call is
/// aborted and nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslucentError {
    /// A class identifier or name did not resolve to a defined class.
    #[error("unknown class '{name}'")]
    UnknownClass {
        /// Name (or identifier rendering) of the missing class.
        name: String,
    },

    /// A class with the same name was already defined.
    #[error("class '{name}' is already defined")]
    DuplicateClass {
        /// Name of the conflicting class.
        name: String,
    },

    /// A class name was empty or contained an empty path segment.
    #[error("invalid class name '{name}'")]
    InvalidClassName {
        /// The rejected name.
        name: String,
    },

    /// An attribute template was not a JSON object or declared a bad name.
    #[error("malformed attribute template for class '{class}': {message}")]
    MalformedTemplate {
        /// Class whose template was rejected.
        class: String,
        /// Human-readable explanation.
        message: String,
    },

    /// A role template could not be turned into an accessor.
    #[error("invalid accessor template '{prototype}' for '{class}::{attribute}': {message}")]
    InvalidTemplate {
        /// Class being bound.
        class: String,
        /// Attribute the accessor was synthesized for.
        attribute: String,
        /// Role prototype that failed.
        prototype: String,
        /// Human-readable explanation.
        message: String,
    },

    /// No method and no fallback exists for the requested name.
    #[error("can't locate method '{method}' via class '{class}'")]
    NoSuchMethod {
        /// Receiver class.
        class: String,
        /// Requested method name.
        method: String,
    },

    /// A constructor argument named no accessor on the class.
    #[error("unknown attribute '{attribute}' for class '{class}'")]
    UnknownAttribute {
        /// Class being constructed.
        class: String,
        /// Offending constructor key.
        attribute: String,
    },

    /// An accessor was called from outside its permitted caller scope.
    #[error("{tier} method '{class}::{method}' called from {caller}")]
    AccessViolation {
        /// Declaring class of the accessor.
        class: String,
        /// Accessor name.
        method: String,
        /// Tier that rejected the call.
        tier: AccessTier,
        /// Description of the calling context.
        caller: String,
    },

    /// A behaviour rejected the arguments it was given.
    #[error("bad arguments to '{class}::{method}': {source}")]
    BadArguments {
        /// Declaring class of the accessor.
        class: String,
        /// Accessor name.
        method: String,
        /// Underlying argument failure.
        #[source]
        source: ArgumentError,
    },

    /// A template value could not be serialized into JSON.
    #[error("failed to serialize template: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Options could not be extracted from their providers.
    #[error("failed to load options: {0}")]
    Options(#[from] Box<figment::Error>),
}

/// Failure reported by an accessor behaviour about its arguments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ArgumentError {
    message: String,
}

impl ArgumentError {
    /// Create an argument error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the explanation supplied by the behaviour.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
