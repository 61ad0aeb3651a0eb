//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI flags
//!     → loader.rs (parse, layer overrides, validate once)
//!     → FleetConfig (validated, immutable)
//!     → scan engine snapshots the sections it needs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a scan runs against one snapshot
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks, and
//!   runs only on the merged file-plus-overrides result

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::FleetConfig;
pub use schema::HttpClientConfig;
pub use schema::RetryConfig;
pub use schema::ScanConfig;
