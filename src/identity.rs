//! Caller identities.
//!
//! The ledger never authenticates anyone. Whoever embeds it resolves the
//! calling principal (signature check, session token, ...) and hands the
//! result in as a [`Principal`]. Equality is byte-for-byte on the identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque principal identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap an identifier supplied by the environment.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines and listings.
    pub fn short(&self) -> String {
        if self.0.chars().count() <= 12 {
            return self.0.clone();
        }
        let prefix: String = self.0.chars().take(10).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Principal {
    fn from(id: String) -> Self {
        Self(id)
    }
}
