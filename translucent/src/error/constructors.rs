//! Constructors for the error variants raised on hot paths.
//!
//! Call sites need `Arc<TranslucentError>` values, so each helper wraps the
//! variant once instead of repeating `Arc::new(..)` everywhere.

use std::sync::Arc;

use super::TranslucentError;

impl TranslucentError {
    /// Build an [`TranslucentError::UnknownClass`] wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use translucent::TranslucentError;
    /// let err = TranslucentError::unknown_class("Shop::Widget");
    /// assert_eq!(err.to_string(), "unknown class 'Shop::Widget'");
    /// ```
    #[must_use]
    pub fn unknown_class(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::UnknownClass { name: name.into() })
    }

    /// Build a [`TranslucentError::NoSuchMethod`] wrapped in an [`Arc`].
    #[must_use]
    pub fn no_such_method(class: impl Into<String>, method: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::NoSuchMethod {
            class: class.into(),
            method: method.into(),
        })
    }

    /// Build a [`TranslucentError::MalformedTemplate`] wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use translucent::TranslucentError;
    /// let err = TranslucentError::malformed_template("Widget", "expected an object");
    /// assert!(matches!(&*err, TranslucentError::MalformedTemplate { .. }));
    /// ```
    #[must_use]
    pub fn malformed_template(class: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::MalformedTemplate {
            class: class.into(),
            message: message.into(),
        })
    }

    /// Returns `true` when the error reports an access-tier violation.
    #[must_use]
    pub const fn is_access_violation(&self) -> bool {
        matches!(self, Self::AccessViolation { .. })
    }

    /// Returns `true` when the error reports an unresolvable method.
    #[must_use]
    pub const fn is_no_such_method(&self) -> bool {
        matches!(self, Self::NoSuchMethod { .. })
    }
}

impl From<figment::Error> for TranslucentError {
    fn from(source: figment::Error) -> Self {
        Self::Options(Box::new(source))
    }
}
