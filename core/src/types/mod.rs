//! Shared types and display helpers
//!
//! - [`ScanConfig`]: options for building a tree from a directory
//! - [`format_id`], [`format_date`], [`format_time`]: listing helpers

mod format;
mod scan_config;

pub use format::{format_date, format_id, format_time};
pub use scan_config::ScanConfig;
