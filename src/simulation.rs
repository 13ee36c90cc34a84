//! Intervention simulation.
//!
//! One run repeatedly removes a target chosen by the configured strategy,
//! lets deficient components try to repair themselves, prunes every
//! component still missing a resource, and records the state of what is
//! left. The run ends when no node survives.

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::adaptation::{adapt, AdaptationParams};
use crate::analysis::centralization::{betweenness_centralization, degree_centralization};
use crate::network::{AttributeTable, Network, NodeId};
use crate::targeting::{select_target, Cutset, Strategy, TargetingContext};
use crate::utils::weighted::WeightError;

/// Errors that abort a simulation run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("Cannot select a target: the network is empty")]
    EmptyGraph,
    #[error("Invalid donor weights: {0}")]
    InvalidWeights(#[from] WeightError),
}

/// Parameters fixed for the duration of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    pub strategy: Strategy,
    pub adaptation: bool,
    pub reattach_probability: f64,
    pub ignore_equipment: bool,
}

impl RunConfiguration {
    /// Configuration with adaptation set by the strategy itself.
    pub fn for_strategy(strategy: Strategy, reattach_probability: f64, ignore_equipment: bool) -> Self {
        Self {
            strategy,
            adaptation: strategy.allows_adaptation(),
            reattach_probability,
            ignore_equipment,
        }
    }
}

/// State of the network after one removal step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub removed: NodeId,
    pub betweenness_centralization: f64,
    pub degree_centralization: f64,
    pub components: usize,
    pub largest_component: usize,
    pub surviving_nodes: usize,
}

impl SimulationRecord {
    /// Snapshot of `network` after `removed` and the pruning that followed.
    pub fn capture(removed: NodeId, network: &Network) -> Self {
        let components = network.connected_components();
        Self {
            removed,
            betweenness_centralization: betweenness_centralization(network),
            degree_centralization: degree_centralization(network),
            components: components.len(),
            largest_component: components.iter().map(Vec::len).max().unwrap_or(0),
            surviving_nodes: network.node_count(),
        }
    }
}

/// Run one simulation from `initial` until no node survives.
///
/// `initial` is never modified. Every random decision draws from `rng`, so
/// a seeded generator makes the run reproducible.
pub fn run<R: Rng + ?Sized>(
    initial: &Network,
    attributes: &AttributeTable,
    config: &RunConfiguration,
    rng: &mut R,
) -> Result<Vec<SimulationRecord>, SimulationError> {
    let mut network = initial.clone();
    let mut cutset = Cutset::new();
    let mut records = Vec::with_capacity(initial.node_count());

    let context = TargetingContext {
        attributes,
        ignore_equipment: config.ignore_equipment,
        original_size: initial.node_count(),
    };
    let params = AdaptationParams {
        reattach_probability: config.reattach_probability,
        ignore_equipment: config.ignore_equipment,
    };

    while !network.is_empty() {
        let target = select_target(&config.strategy, &network, &context, &mut cutset, rng)?;

        let previous = network.clone();
        network.remove_node(target);

        if config.adaptation && network.connected_components().len() > 1 {
            let repairs = adapt(&mut network, &previous, target, attributes, &params, rng)?;
            trace!("Step {}: {} repair attempts", records.len() + 1, repairs.len());
        }

        let pruned = prune_deficient(&mut network, attributes, config.ignore_equipment);
        for node in &pruned {
            cutset.remove(node);
        }

        let record = SimulationRecord::capture(target, &network);
        debug!(
            "Step {}: removed {}, pruned {}, {} nodes in {} components",
            records.len() + 1,
            target,
            pruned.len(),
            record.surviving_nodes,
            record.components
        );
        records.push(record);
    }

    Ok(records)
}

/// Remove every component that lacks a resource. Returns the removed nodes.
pub fn prune_deficient(
    network: &mut Network,
    attributes: &AttributeTable,
    ignore_equipment: bool,
) -> Vec<NodeId> {
    let bad: Vec<NodeId> = network
        .connected_components()
        .into_iter()
        .filter(|c| !attributes.is_fully_resourced(c.iter().copied(), ignore_equipment))
        .flatten()
        .collect();
    network.remove_nodes(bad.iter().copied());
    bad
}
