//! Fleet targets and shared credentials.

use std::fmt;

use serde::Deserialize;

/// One server to scan, as parsed from the fleet list.
///
/// Immutable once constructed. Duplicate identifiers are deliberately kept
/// as independent targets; each input line is its own task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    /// Hostname (or address) as it appeared in the fleet list.
    pub identifier: String,
    /// Cluster the fleet list placed this server in.
    pub cluster: String,
    /// Pre-resolved address, if the input supplied one. `None` means the
    /// runner resolves the identifier itself.
    pub address: Option<String>,
}

impl ServerTarget {
    pub fn new(identifier: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            cluster: cluster.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// The credential pair applied to every target.
///
/// Read-only and shared across all scan tasks. There is no per-server
/// override.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// The password must never reach logs, so Debug is written by hand.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
