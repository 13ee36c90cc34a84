//! Structural metrics and experiment reporting.
//!
//! This module provides the centralization indices recorded at every
//! simulation step, the aggregation of many runs per strategy, and JSON and
//! text report generation.

pub mod types;
pub mod centralization;
pub mod aggregate;
pub mod report;

pub use types::*;
pub use centralization::{betweenness_centralization, degree_centralization};
pub use aggregate::{summarize_experiment, summarize_strategy};
pub use report::{build_report, generate_json_report, generate_text_report, print_summary, render_text_report};
