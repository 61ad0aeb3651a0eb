//! Input file adapters.
//!
//! # Responsibilities
//! - Parse server inventory files into `ServerTarget`s
//! - Parse credential files into `Credentials`
//! - Keep inventory order and duplicates exactly as written
//!
//! # Data Flow
//! ```text
//! targets file (text or CSV)
//!     → targets.rs (parse, attach cluster labels)
//!     → Vec<ServerTarget> (input order preserved)
//!
//! credentials file (key=value or JSON)
//!     → credentials.rs
//!     → Credentials (shared across every server)
//! ```
//!
//! # Design Decisions
//! - Format is chosen by file extension, never by sniffing content
//! - Hostnames before any cluster header fall into cluster "default"
//! - Duplicate hostnames are kept; the scan reports each occurrence

pub mod credentials;
pub mod targets;

pub use credentials::load_credentials;
pub use targets::load_targets;

/// Error type for input file loading.
#[derive(Debug)]
pub enum InputError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    MissingField { path: String, field: &'static str },
    MissingColumn { path: String, column: &'static str },
    Empty { path: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            InputError::Json { path, source } => {
                write!(f, "invalid JSON in {}: {}", path, source)
            }
            InputError::MissingField { path, field } => {
                write!(f, "{} is missing required field \"{}\"", path, field)
            }
            InputError::MissingColumn { path, column } => {
                write!(f, "{} has no \"{}\" column in its header row", path, column)
            }
            InputError::Empty { path } => {
                write!(f, "{} contains no servers", path)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io { source, .. } => Some(source),
            InputError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl InputError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.to_string(),
            source,
        }
    }
}
