//! Report data types for simulation experiments.

use serde::{Deserialize, Serialize};

/// Mean of every record metric at one step across the runs of a strategy.
///
/// Runs that ended before this step contribute zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAverage {
    pub step: usize,
    pub betweenness_centralization: f64,
    pub degree_centralization: f64,
    pub components: f64,
    pub largest_component: f64,
    pub surviving_nodes: f64,
}

/// Aggregated results for one strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySummary {
    pub tag: u8,
    pub name: String,
    pub adaptation: bool,
    pub runs: usize,
    pub min_steps: usize,
    pub max_steps: usize,
    pub mean_steps: f64,
    /// Steps after which, on average, half of the original network is gone
    pub half_life_step: Option<usize>,
    pub mean_trajectory: Vec<StepAverage>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    pub analysis_timestamp: String,
    pub network_file: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub repetitions: usize,
    pub master_seed: u64,
    pub reattach_probability: f64,
    pub ignore_equipment: bool,
}

/// Complete experiment report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub metadata: ExperimentMetadata,
    pub strategies: Vec<StrategySummary>,
}
