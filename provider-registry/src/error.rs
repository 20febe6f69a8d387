use std::fmt;

fn key_label(primary: &str, secondary: &str) -> String {
    if secondary.is_empty() {
        format!("'{primary}'")
    } else {
        format!("'{primary}' / '{secondary}'")
    }
}

/// No implementation is registered under the requested compound key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no {registry} registered for {}", key_label(.primary, .secondary))]
pub struct ProviderNotFound {
    /// What kind of implementation the registry holds.
    pub registry: &'static str,

    /// The primary key which was looked up.
    pub primary: String,

    /// The secondary key which was looked up, empty for single-level registries.
    pub secondary: String,
}

/// An implementation is already registered under the compound key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a {registry} is already registered for {}", key_label(.primary, .secondary))]
pub struct DuplicateProvider {
    /// What kind of implementation the registry holds.
    pub registry: &'static str,

    /// The primary key of the rejected registration.
    pub primary: String,

    /// The secondary key of the rejected registration.
    pub secondary: String,
}

impl ProviderNotFound {
    pub(crate) fn new(registry: &'static str, primary: impl fmt::Display, secondary: impl fmt::Display) -> Self {
        Self {
            registry,
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }
}

impl DuplicateProvider {
    pub(crate) fn new(registry: &'static str, primary: impl fmt::Display, secondary: impl fmt::Display) -> Self {
        Self {
            registry,
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }
}
