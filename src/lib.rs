//! Fleet health scanner library.

pub mod collect;
pub mod config;
pub mod detect;
pub mod input;
pub mod model;
pub mod report;
pub mod scan;

pub use config::FleetConfig;
pub use report::Report;
pub use scan::ScanEngine;
