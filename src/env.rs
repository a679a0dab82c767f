//! Environment signal source
//!
//! Handlers never call `std::env` directly. They read through an
//! [`EnvSource`] so readiness, identity and config introspection can be
//! driven by a fixed map in tests and toggled live by an operator in
//! production.

use std::collections::BTreeMap;

/// Read-only view over a set of environment variables
pub trait EnvSource: Send + Sync {
    /// Look up a single variable
    fn var(&self, key: &str) -> Option<String>;

    /// Snapshot of every variable, sorted by key
    fn vars(&self) -> BTreeMap<String, String>;
}

/// Reads the live process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn vars(&self) -> BTreeMap<String, String> {
        // vars_os: std::env::vars() panics on non-UTF-8 entries
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// Fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: BTreeMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn vars(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }
}
