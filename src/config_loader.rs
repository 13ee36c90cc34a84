use crate::config::ExperimentConfig;
use crate::network::{AttributeRow, AttributeTable, Network, NetworkError, NodeId};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load and validate an experiment configuration from a YAML file.
///
/// A relative `network` path is resolved against the configuration file's
/// directory.
pub fn load_config(config_path: &Path) -> Result<ExperimentConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;
    let mut config: ExperimentConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    if config.network.is_relative() {
        if let Some(dir) = config_path.parent() {
            config.network = dir.join(&config.network);
        }
    }

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct ExperimentOverrides {
    pub network: Option<std::path::PathBuf>,
    pub repetitions: Option<usize>,
    pub seed: Option<u64>,
}

/// Apply CLI overrides to an experiment configuration
pub fn apply_overrides(config: &mut ExperimentConfig, overrides: &ExperimentOverrides) -> Result<()> {
    if let Some(network) = &overrides.network {
        info!("Network file overridden: {:?}", network);
        config.network = network.clone();
    }

    if let Some(repetitions) = overrides.repetitions {
        info!("Repetitions overridden: {}", repetitions);
        config.repetitions = repetitions;
    }

    if let Some(seed) = overrides.seed {
        info!("Seed overridden: {}", seed);
        config.seed = Some(seed);
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Raw network input: parallel edge lists and one attribute row per node
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkData {
    #[serde(rename = "ID1")]
    pub sources: Vec<NodeId>,
    #[serde(rename = "ID2")]
    pub targets: Vec<NodeId>,
    pub node_attributes: Vec<AttributeRow>,
}

impl NetworkData {
    /// Build the undirected network over `1..=node_count` and its attribute table.
    pub fn build(&self, node_count: usize) -> std::result::Result<(Network, AttributeTable), NetworkError> {
        let network = Network::from_edge_lists(node_count, &self.sources, &self.targets)?;
        let attributes = AttributeTable::from_rows(&self.node_attributes)?;

        if attributes.len() < node_count {
            return Err(NetworkError::MissingAttributes {
                rows: attributes.len(),
                node_count,
            });
        }
        if attributes.len() > node_count {
            warn!(
                "Attribute table has {} rows; only the first {} are used",
                attributes.len(),
                node_count
            );
        }

        let isolated = network.nodes().filter(|&id| network.degree(id) == 0).count();
        if isolated > 0 {
            warn!("{} of {} nodes have no connections", isolated, node_count);
        }

        Ok((network, attributes))
    }
}

/// Load the network and attribute table from a JSON file
pub fn load_network(path: &Path, node_count: usize) -> Result<(Network, AttributeTable)> {
    info!("Loading network from: {:?}", path);

    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open network file '{}'", path.display()))?;
    let data: NetworkData = serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to parse network file '{}'", path.display()))?;

    let (network, attributes) = data
        .build(node_count)
        .wrap_err_with(|| format!("Invalid network in '{}'", path.display()))?;

    info!(
        "Loaded network with {} nodes and {} edges",
        network.node_count(),
        network.edge_count()
    );

    Ok((network, attributes))
}
