//! Identifier newtypes shared by the knowledge and poison subsystems.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Canonical item code in `domain:path` form (e.g. `game:mushroom-bolete-normal`).
///
/// Codes written without a domain are treated as belonging to the base `game`
/// domain, matching how the host resolves bare paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(String);

impl ItemCode {
    /// Build a code from an explicit domain and path.
    pub fn new(domain: &str, path: &str) -> Self {
        Self(format!("{domain}:{path}"))
    }

    /// Parse a code string, defaulting the domain to `game` when absent.
    pub fn parse(code: &str) -> Self {
        if code.contains(':') {
            Self(code.to_string())
        } else {
            Self(format!("game:{code}"))
        }
    }

    /// Domain part (`game` in `game:fruit-lychee`).
    pub fn domain(&self) -> &str {
        self.0.split_once(':').map_or("game", |(d, _)| d)
    }

    /// Path part (`fruit-lychee` in `game:fruit-lychee`).
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, p)| p)
    }

    /// Full `domain:path` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemCode {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

/// Host-assigned player identifier (player UIDs are opaque strings).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

/// Host-assigned entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
