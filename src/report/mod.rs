//! Report assembly and rendering.
//!
//! # Data Flow
//! ```text
//! Vec<ServerResult> (scan order)
//!     → aggregate.rs (group by cluster, first-seen order, count tiers)
//!     → Report
//!     → console.rs (colored, human-first)
//!     → csv.rs     (one row per component)
//!     → json.rs    (machine view with summary block)
//! ```
//!
//! # Design Decisions
//! - Grouping preserves input order twice over: clusters appear in
//!   first-seen order, servers keep scan-list order inside each cluster
//! - Renderers key colors and counters off Severity, never vendor strings
//! - Rendering is pure string building; callers decide where bytes go

pub mod aggregate;
pub mod console;
pub mod csv;
pub mod json;

pub use aggregate::{ClusterGroup, Report, Summary};
pub use console::render_console;
pub use csv::render_csv;
pub use json::render_json;
