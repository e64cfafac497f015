//! Serialised control of the `TRANSLUCENT_*` option variables.
//!
//! Option loading reads the process environment, which tests share. An
//! [`OptionEnv`] holds a global re-entrant lock for its whole lifetime,
//! clears every `TRANSLUCENT_*` variable, applies the requested overrides,
//! and restores the previous values when dropped.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let scope = env::options(&[("TRANSLUCENT_REBIND", "extend")]);
//! assert_eq!(std::env::var("TRANSLUCENT_REBIND").as_deref(), Ok("extend"));
//! drop(scope);
//! ```

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Prefix shared by every option variable.
pub const PREFIX: &str = "TRANSLUCENT_";

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Scope owning the option variables until dropped.
#[must_use = "dropping restores the previous environment"]
pub struct OptionEnv {
    _lock: ReentrantMutexGuard<'static, ()>,
    saved: Vec<(String, Option<OsString>)>,
}

impl OptionEnv {
    fn save(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_owned(), env::var_os(key)));
        }
    }

    /// Set another option variable inside the scope.
    pub fn set(&mut self, key: &str, value: &str) {
        self.save(key);
        // SAFETY: `ENV_MUTEX` is held for the lifetime of `self`.
        unsafe { env::set_var(key, value) };
    }
}

impl Drop for OptionEnv {
    fn drop(&mut self) {
        for (key, original) in self.saved.drain(..).rev() {
            match original {
                // SAFETY: `ENV_MUTEX` is held until `self` is gone.
                Some(value) => unsafe { env::set_var(&key, value) },
                // SAFETY: as above.
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

impl fmt::Debug for OptionEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.saved.iter().map(|(key, _)| key.as_str()).collect();
        f.debug_struct("OptionEnv")
            .field("keys", &keys)
            .finish_non_exhaustive()
    }
}

/// Clear every `TRANSLUCENT_*` variable, then apply `overrides`.
///
/// Nested scopes on the same thread are allowed; scopes on other threads
/// wait until this one is dropped.
pub fn options(overrides: &[(&str, &str)]) -> OptionEnv {
    let mut scope = OptionEnv {
        _lock: ENV_MUTEX.lock(),
        saved: Vec::new(),
    };
    let present: Vec<String> = env::vars_os()
        .filter_map(|(key, _)| key.into_string().ok())
        .filter(|key| key.starts_with(PREFIX))
        .collect();
    for key in present {
        scope.save(&key);
        // SAFETY: `ENV_MUTEX` is held for the lifetime of `scope`.
        unsafe { env::remove_var(&key) };
    }
    for (key, value) in overrides {
        scope.set(key, value);
    }
    scope
}
