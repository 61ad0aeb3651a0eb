//! Shared data model.
//!
//! # Data Flow
//! ```text
//! input adapters produce:
//!     → ServerTarget (one per fleet list line)
//!     → Credentials (one pair for the whole fleet)
//!
//! the scan engine produces:
//!     → ProtocolKind (detector, once per target)
//!     → ComponentHealth rows (collectors)
//!     → ServerResult (task runner, exactly one per target)
//!
//! the aggregator consumes ServerResults and renderers consume
//! Severity, never raw vendor health strings.
//! ```
//!
//! # Design Decisions
//! - All types are plain owned data; cheap to clone across tasks
//! - Severity is derived from HealthStatus in exactly one place
//! - Credentials redact the password from Debug output

pub mod health;
pub mod protocol;
pub mod result;
pub mod target;

pub use health::{ComponentCategory, ComponentHealth, HealthStatus, Severity, OVERALL_COMPONENT};
pub use protocol::ProtocolKind;
pub use result::ServerResult;
pub use target::{Credentials, ServerTarget};
