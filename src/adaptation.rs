//! Adaptive repair of resource-deficient components.
//!
//! After a removal, a component that no longer holds every resource may
//! recruit one donor from elsewhere in the network. Donors must restore the
//! full resource set and were reachable from the component before the
//! removal. Nearer donors are preferred: each candidate is weighted by the
//! inverse of its pre-removal distance to the component. Former neighbours of
//! the removed node then link to the donor, each with probability `p`.

use log::debug;
use rand::Rng;

use crate::network::{AttributeTable, Network, NodeId};
use crate::simulation::SimulationError;
use crate::utils::weighted::weighted_choice;

/// Repair parameters for one run
#[derive(Debug, Clone, Copy)]
pub struct AdaptationParams {
    /// Probability that each former neighbour of the removed node links to the donor
    pub reattach_probability: f64,
    pub ignore_equipment: bool,
}

/// What happened to a single deficient component
#[derive(Debug, Clone, PartialEq)]
pub struct Repair {
    pub component_size: usize,
    pub donor: Option<NodeId>,
    pub new_edges: usize,
}

/// Give every deficient component of `network` one chance to recruit a donor.
///
/// `previous` is the network as it was just before `removed` was taken out.
/// Only new edges are created; no node is added or removed.
pub fn adapt<R: Rng + ?Sized>(
    network: &mut Network,
    previous: &Network,
    removed: NodeId,
    attributes: &AttributeTable,
    params: &AdaptationParams,
    rng: &mut R,
) -> Result<Vec<Repair>, SimulationError> {
    let ignore = params.ignore_equipment;
    let components = network.connected_components();
    let mut repairs = Vec::new();

    for component in &components {
        let present = attributes.attributes_present(component.iter().copied(), ignore);
        if present.is_complete(ignore) {
            continue;
        }

        let distance = previous.distances_from(component.iter().copied());
        let mut candidates = Vec::new();
        let mut weights = Vec::new();

        for vt in network.nodes() {
            if component.binary_search(&vt).is_ok() {
                continue;
            }
            let Some(d) = distance.get(vt as usize).copied().flatten() else {
                continue;
            };
            if d == 0 {
                continue;
            }
            if present
                .union(attributes.node_resources(vt, ignore))
                .is_complete(ignore)
            {
                candidates.push(vt);
                weights.push(1.0 / d as f64);
            }
        }

        if candidates.is_empty() {
            debug!(
                "Component of {} nodes lacks {:?} and has no donor",
                component.len(),
                missing(present.indices(), ignore)
            );
            repairs.push(Repair { component_size: component.len(), donor: None, new_edges: 0 });
            continue;
        }

        let donor = candidates[weighted_choice(&weights, rng)?];
        let mut new_edges = 0;
        for &member in component {
            if !previous.has_edge(member, removed) {
                continue;
            }
            if rng.gen::<f64>() < params.reattach_probability && network.add_edge(member, donor) {
                new_edges += 1;
            }
        }

        debug!(
            "Component of {} nodes recruited donor {} with {} new edges",
            component.len(),
            donor,
            new_edges
        );
        repairs.push(Repair { component_size: component.len(), donor: Some(donor), new_edges });
    }

    Ok(repairs)
}

fn missing(present: Vec<u8>, ignore_equipment: bool) -> Vec<u8> {
    (1..=8)
        .filter(|i| !present.contains(i) && !(ignore_equipment && *i == 4))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::AttributeVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn row(indices: &[u8]) -> AttributeVector {
        let mut flags = [false; 8];
        for &i in indices {
            flags[(i - 1) as usize] = true;
        }
        AttributeVector::new(flags)
    }

    const ALL: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    fn always() -> AdaptationParams {
        AdaptationParams { reattach_probability: 1.0, ignore_equipment: false }
    }

    /// 1 - 2 - 3 - 4 - 5 where 3 is removed. The left part {1,2} lacks labour,
    /// held only by 5 on the right.
    fn split_line() -> (Network, Network, AttributeTable) {
        let previous = Network::from_edge_lists(5, &[1, 2, 3, 4], &[2, 3, 4, 5]).unwrap();
        let mut network = previous.clone();
        network.remove_node(3);
        let table = AttributeTable::new(vec![
            row(&[1, 2, 3, 4]),
            row(&[5, 6, 7]),
            row(&ALL),
            row(&ALL),
            row(&[8]),
        ]);
        (network, previous, table)
    }

    #[test]
    fn test_donor_links_to_former_neighbours() {
        let (mut network, previous, table) = split_line();
        let mut rng = StdRng::seed_from_u64(1);

        let repairs = adapt(&mut network, &previous, 3, &table, &always(), &mut rng).unwrap();

        // Only {1,2} is deficient; 4 holds everything, 5 supplies labour
        assert_eq!(repairs.len(), 1);
        let donor = repairs[0].donor.unwrap();
        assert!(donor == 4 || donor == 5);
        assert!(network.has_edge(2, donor));
        assert!(!network.has_edge(1, donor));
        assert_eq!(network.connected_components().len(), 1);
    }

    #[test]
    fn test_nearer_donors_are_preferred() {
        let (network, previous, table) = split_line();
        let mut rng = StdRng::seed_from_u64(99);
        let mut near = 0;
        let trials = 3000;
        for _ in 0..trials {
            let mut working = network.clone();
            let repairs = adapt(&mut working, &previous, 3, &table, &always(), &mut rng).unwrap();
            if repairs[0].donor == Some(4) {
                near += 1;
            }
        }
        // Distances 2 and 3 give weights 1/2 and 1/3: P(4) = 0.6
        let frequency = near as f64 / trials as f64;
        assert!((frequency - 0.6).abs() < 0.04, "frequency {}", frequency);
    }

    #[test]
    fn test_zero_probability_adds_no_edges() {
        let (mut network, previous, table) = split_line();
        let edges = network.edge_count();
        let params = AdaptationParams { reattach_probability: 0.0, ignore_equipment: false };
        let mut rng = StdRng::seed_from_u64(4);

        let repairs = adapt(&mut network, &previous, 3, &table, &params, &mut rng).unwrap();
        assert!(repairs[0].donor.is_some());
        assert_eq!(repairs[0].new_edges, 0);
        assert_eq!(network.edge_count(), edges);
    }

    #[test]
    fn test_unreachable_or_insufficient_donors_are_ignored() {
        // 1 - 2 - 3, isolated 4 holds everything; 3 is removed
        let previous = Network::from_edge_lists(4, &[1, 2], &[2, 3]).unwrap();
        let mut network = previous.clone();
        network.remove_node(3);
        let table = AttributeTable::new(vec![row(&[1]), row(&[2]), row(&ALL), row(&ALL)]);
        let mut rng = StdRng::seed_from_u64(6);

        let repairs = adapt(&mut network, &previous, 3, &table, &always(), &mut rng).unwrap();
        assert_eq!(repairs, vec![Repair { component_size: 2, donor: None, new_edges: 0 }]);
        assert_eq!(network.edge_count(), 1);
    }

    #[test]
    fn test_equipment_can_be_ignored() {
        // {1,2} lacks equipment only
        let previous = Network::from_edge_lists(3, &[1, 2], &[2, 3]).unwrap();
        let mut network = previous.clone();
        network.remove_node(3);
        network.add_node(3);
        let table = AttributeTable::new(vec![row(&[1, 2, 3]), row(&[5, 6, 7, 8]), row(&[])]);
        let mut rng = StdRng::seed_from_u64(6);
        let params = AdaptationParams { reattach_probability: 1.0, ignore_equipment: true };

        let repairs = adapt(&mut network, &previous, 3, &table, &params, &mut rng).unwrap();
        // {1,2} is complete without equipment; the isolated 3 has no donor
        assert_eq!(repairs.len(), 1);
        assert_eq!(repairs[0].component_size, 1);
        assert_eq!(repairs[0].donor, None);
    }

    #[test]
    fn test_missing_categories() {
        assert_eq!(missing(vec![1, 2, 3, 5, 6, 7], false), vec![4, 8]);
        assert_eq!(missing(vec![1, 2, 3, 5, 6, 7], true), vec![8]);
    }
}
