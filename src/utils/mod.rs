//! Shared utilities.

pub mod weighted;

pub use weighted::{weighted_choice, WeightError};
