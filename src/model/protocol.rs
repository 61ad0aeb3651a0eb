//! Management protocol families.

use std::fmt;

/// The out-of-band management API dialect a controller speaks.
///
/// Produced by the detector exactly once per target. `Unknown` means every
/// probe failed; such a target is never queried for component detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolKind {
    /// HP iLO: Redfish rooted at `/redfish/v1/Systems/1`, Basic auth.
    Ilo,
    /// Dell iDRAC: Redfish rooted at `/redfish/v1/Systems/System.Embedded.1`,
    /// session-token auth.
    Idrac,
    Unknown,
}

impl ProtocolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProtocolKind::Ilo => "iLO",
            ProtocolKind::Idrac => "iDRAC",
            ProtocolKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
