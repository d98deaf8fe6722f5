//! Caller identity and timestamp primitives.
//!
//! An [`Identity`] is the opaque address or key the external session
//! provider authenticated for a request. The core trusts it as-is and never
//! interprets it beyond equality and display.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Opaque caller identity supplied by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Creates an identity from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Current wall-clock time in nanoseconds since the Unix epoch.
///
/// Mutations capture their timestamp once, before validation, so the value
/// recorded on the evidence record and its custody entry is identical.
// Timestamps won't overflow u64 until the year 2554.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
