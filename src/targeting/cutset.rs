//! Cutset targeting.
//!
//! True minimum cutsets of the whole network are too expensive to enumerate,
//! so the search picks two non-adjacent vertices `u`, `v` of the largest
//! component maximising `|N(u) \ N(v)| * |N(v) \ N(u)|` and removes a minimum
//! vertex cut separating them, one vertex per step. The remaining cut vertices
//! are carried between steps until exhausted.

use std::collections::BTreeSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::flow::minimum_vertex_cut;
use crate::network::{Network, NodeId};
use crate::simulation::SimulationError;

/// Vertices still to be removed from the current cut.
pub type Cutset = BTreeSet<NodeId>;

/// Pick the next cutset target, researching a new cut when `cutset` is empty.
///
/// Members that are no longer alive are dropped first. The returned node is
/// removed from `cutset`; if no separable pair exists, the highest-degree
/// vertex of the largest component is returned and `cutset` stays empty.
pub fn cutset_target<R: Rng + ?Sized>(
    network: &Network,
    cutset: &mut Cutset,
    rng: &mut R,
) -> Result<NodeId, SimulationError> {
    if network.is_empty() {
        return Err(SimulationError::EmptyGraph);
    }

    cutset.retain(|&v| network.contains_node(v));

    if cutset.is_empty() {
        let component = largest_component(network, rng).ok_or(SimulationError::EmptyGraph)?;
        let ordered = by_degree(network, &component);

        match best_separable_pair(network, &ordered) {
            Some((u, v)) => {
                if let Some(cut) = minimum_vertex_cut(network, u, v) {
                    debug!("New cutset separating {} and {}: {:?}", u, v, cut);
                    *cutset = cut;
                }
            }
            None => debug!("No separable pair in component of size {}", component.len()),
        }

        if cutset.is_empty() {
            return ordered.first().copied().ok_or(SimulationError::EmptyGraph);
        }
    }

    let index = rng.gen_range(0..cutset.len());
    let target = cutset
        .iter()
        .nth(index)
        .copied()
        .ok_or(SimulationError::EmptyGraph)?;
    cutset.remove(&target);
    Ok(target)
}

/// A largest connected component, ties broken uniformly at random.
pub fn largest_component<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> Option<Vec<NodeId>> {
    let components = network.connected_components();
    let max_size = components.iter().map(Vec::len).max()?;
    let largest: Vec<Vec<NodeId>> = components
        .into_iter()
        .filter(|c| c.len() == max_size)
        .collect();
    largest.choose(rng).cloned()
}

/// Vertices sorted by degree descending, ties by ascending id.
fn by_degree(network: &Network, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut ordered = nodes.to_vec();
    ordered.sort_by(|a, b| network.degree(*b).cmp(&network.degree(*a)).then(a.cmp(b)));
    ordered
}

/// First non-adjacent pair, in degree order, with the largest positive
/// product of exclusive neighbourhood sizes.
fn best_separable_pair(network: &Network, ordered: &[NodeId]) -> Option<(NodeId, NodeId)> {
    let mut best = None;
    let mut best_score = 0;

    for (i, &u) in ordered.iter().enumerate() {
        let Some(nu) = network.neighbor_set(u) else { continue };
        for &v in &ordered[i + 1..] {
            if nu.contains(&v) {
                continue;
            }
            let Some(nv) = network.neighbor_set(v) else { continue };
            let score = nu.difference(nv).count() * nv.difference(nu).count();
            if score > best_score {
                best_score = score;
                best = Some((u, v));
            }
        }
    }

    best
}
