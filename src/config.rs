use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::simulation::RunConfiguration;
use crate::targeting::{Strategy, DEFAULT_SWITCH_FRACTION};

/// Number of actors in the reference network
pub const DEFAULT_NODE_COUNT: usize = 128;

/// Experiment configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// JSON file holding `ID1`, `ID2` and `node_attributes`
    pub network: PathBuf,
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    /// Runs per strategy
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    /// Strategy tags to simulate, in report order
    #[serde(default = "Strategy::all")]
    pub strategies: Vec<Strategy>,
    #[serde(default = "default_reattach_probability")]
    pub reattach_probability: f64,
    #[serde(default)]
    pub ignore_equipment: bool,
    /// Master seed; drawn at random and logged when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Surviving fraction below which hybrid strategies stop cutset targeting
    #[serde(default = "default_switch_fraction")]
    pub hybrid_switch_fraction: f64,
}

fn default_node_count() -> usize {
    DEFAULT_NODE_COUNT
}

fn default_repetitions() -> usize {
    100
}

fn default_reattach_probability() -> f64 {
    0.5
}

fn default_switch_fraction() -> f64 {
    DEFAULT_SWITCH_FRACTION
}

impl ExperimentConfig {
    /// Configuration with defaults for everything but the network file
    pub fn new(network: impl Into<PathBuf>) -> Self {
        Self {
            network: network.into(),
            node_count: DEFAULT_NODE_COUNT,
            repetitions: default_repetitions(),
            strategies: Strategy::all(),
            reattach_probability: default_reattach_probability(),
            ignore_equipment: false,
            seed: None,
            hybrid_switch_fraction: DEFAULT_SWITCH_FRACTION,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.network.as_os_str().is_empty() {
            return Err(ValidationError::InvalidInput(
                "network path cannot be empty".to_string(),
            ));
        }
        if self.node_count == 0 {
            return Err(ValidationError::InvalidInput(
                "node_count must be at least 1".to_string(),
            ));
        }
        if self.repetitions == 0 {
            return Err(ValidationError::InvalidExperiment(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if self.strategies.is_empty() {
            return Err(ValidationError::InvalidExperiment(
                "at least one strategy must be selected".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reattach_probability) {
            return Err(ValidationError::InvalidAdaptation(format!(
                "reattach_probability must lie in [0, 1], got {}",
                self.reattach_probability
            )));
        }
        if !(self.hybrid_switch_fraction > 0.0 && self.hybrid_switch_fraction < 1.0) {
            return Err(ValidationError::InvalidExperiment(format!(
                "hybrid_switch_fraction must lie in (0, 1), got {}",
                self.hybrid_switch_fraction
            )));
        }
        Ok(())
    }

    /// Run configuration for one strategy of this experiment
    pub fn run_configuration(&self, strategy: Strategy) -> RunConfiguration {
        RunConfiguration::for_strategy(
            strategy.with_switch_fraction(self.hybrid_switch_fraction),
            self.reattach_probability,
            self.ignore_equipment,
        )
    }
}

/// Validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid input configuration: {0}")]
    InvalidInput(String),
    #[error("Invalid experiment configuration: {0}")]
    InvalidExperiment(String),
    #[error("Invalid adaptation configuration: {0}")]
    InvalidAdaptation(String),
}
