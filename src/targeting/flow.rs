//! Minimum s-t vertex cut via unit-capacity max flow.
//!
//! Each vertex `v` is split into `v_in -> v_out` with capacity 1 (unbounded
//! for the terminals), and each undirected edge becomes a pair of unbounded
//! arcs `u_out -> v_in`, `v_out -> u_in`. A maximum flow from `s_out` to
//! `t_in` saturates a minimum set of split arcs; those vertices form the cut.

use std::collections::{BTreeSet, VecDeque};

use crate::network::{Network, NodeId};

const UNBOUNDED: i64 = i64::MAX / 4;

struct FlowNetwork {
    adjacency: Vec<Vec<usize>>,
    to: Vec<usize>,
    capacity: Vec<i64>,
}

impl FlowNetwork {
    fn new(vertices: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertices],
            to: Vec::new(),
            capacity: Vec::new(),
        }
    }

    /// Arc `e` and its residual twin `e ^ 1`.
    fn add_arc(&mut self, from: usize, to: usize, capacity: i64) {
        self.adjacency[from].push(self.to.len());
        self.to.push(to);
        self.capacity.push(capacity);

        self.adjacency[to].push(self.to.len());
        self.to.push(from);
        self.capacity.push(0);
    }

    /// Edmonds-Karp. Returns the flow value.
    fn max_flow(&mut self, source: usize, sink: usize) -> i64 {
        let mut total = 0;
        let mut via = vec![usize::MAX; self.adjacency.len()];

        loop {
            via.fill(usize::MAX);
            let mut queue = VecDeque::from([source]);
            let mut reached = false;

            while let Some(u) = queue.pop_front() {
                if u == sink {
                    reached = true;
                    break;
                }
                for &e in &self.adjacency[u] {
                    let v = self.to[e];
                    if self.capacity[e] > 0 && v != source && via[v] == usize::MAX {
                        via[v] = e;
                        queue.push_back(v);
                    }
                }
            }

            if !reached {
                return total;
            }

            let mut bottleneck = UNBOUNDED;
            let mut v = sink;
            while v != source {
                let e = via[v];
                bottleneck = bottleneck.min(self.capacity[e]);
                v = self.to[e ^ 1];
            }

            let mut v = sink;
            while v != source {
                let e = via[v];
                self.capacity[e] -= bottleneck;
                self.capacity[e ^ 1] += bottleneck;
                v = self.to[e ^ 1];
            }

            total += bottleneck;
        }
    }

    /// Vertices reachable from `source` through arcs with residual capacity.
    fn residual_reachable(&self, source: usize) -> Vec<bool> {
        let mut seen = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;
        while let Some(u) = queue.pop_front() {
            for &e in &self.adjacency[u] {
                let v = self.to[e];
                if self.capacity[e] > 0 && !seen[v] {
                    seen[v] = true;
                    queue.push_back(v);
                }
            }
        }
        seen
    }
}

/// Smallest set of vertices whose removal disconnects `s` from `t`.
///
/// Returns `None` when `s` and `t` are adjacent, equal, or not both alive,
/// since no vertex cut exists. An empty set means they are already
/// disconnected.
pub fn minimum_vertex_cut(network: &Network, s: NodeId, t: NodeId) -> Option<BTreeSet<NodeId>> {
    if s == t || !network.contains_node(s) || !network.contains_node(t) || network.has_edge(s, t) {
        return None;
    }

    let ids: Vec<NodeId> = network.nodes().collect();
    let index_of = |id: NodeId| ids.binary_search(&id).ok();
    let inside = |i: usize| 2 * i;
    let outside = |i: usize| 2 * i + 1;

    let mut flow = FlowNetwork::new(2 * ids.len());
    for (i, &id) in ids.iter().enumerate() {
        let capacity = if id == s || id == t { UNBOUNDED } else { 1 };
        flow.add_arc(inside(i), outside(i), capacity);
        for neighbor in network.neighbors(id) {
            if let Some(j) = index_of(neighbor) {
                flow.add_arc(outside(i), inside(j), UNBOUNDED);
            }
        }
    }

    let source = outside(index_of(s)?);
    let sink = inside(index_of(t)?);
    flow.max_flow(source, sink);

    let reachable = flow.residual_reachable(source);
    Some(
        ids.iter()
            .enumerate()
            .filter(|&(i, _)| reachable[inside(i)] && !reachable[outside(i)])
            .map(|(_, &id)| id)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_articulation_point() {
        // 1 - 2 - 3 - 4 - 5
        let network = Network::from_edge_lists(5, &[1, 2, 3, 4], &[2, 3, 4, 5]).unwrap();
        let cut = minimum_vertex_cut(&network, 1, 5).unwrap();
        assert_eq!(cut.len(), 1);
        let mut rest = network.clone();
        rest.remove_nodes(cut);
        assert!(!rest.has_path(1, 5));
    }

    #[test]
    fn test_parallel_routes() {
        // Two disjoint routes 1-2-4 and 1-3-4 plus a longer 1-5-6-4
        let network = Network::from_edge_lists(
            6,
            &[1, 2, 1, 3, 1, 5, 6],
            &[2, 4, 3, 4, 5, 6, 4],
        )
        .unwrap();
        let cut = minimum_vertex_cut(&network, 1, 4).unwrap();
        assert_eq!(cut.len(), 3);
        assert!(cut.contains(&2) && cut.contains(&3));
        assert!(cut.contains(&5) || cut.contains(&6));
    }

    #[test]
    fn test_cut_is_closest_to_source() {
        // 1 - 2 - {3, 4} - 5 - 6: vertex 2 and vertex 5 are both size-one cuts
        let network = Network::from_edge_lists(
            6,
            &[1, 2, 2, 3, 4, 5],
            &[2, 3, 4, 5, 5, 6],
        )
        .unwrap();
        let cut = minimum_vertex_cut(&network, 1, 6).unwrap();
        assert_eq!(cut, BTreeSet::from([2]));
    }

    #[test]
    fn test_no_cut_for_adjacent_or_missing() {
        let network = Network::from_edge_lists(3, &[1, 2], &[2, 3]).unwrap();
        assert!(minimum_vertex_cut(&network, 1, 2).is_none());
        assert!(minimum_vertex_cut(&network, 1, 1).is_none());
        assert!(minimum_vertex_cut(&network, 1, 9).is_none());
    }

    #[test]
    fn test_disconnected_terminals() {
        let network = Network::from_edge_lists(4, &[1, 3], &[2, 4]).unwrap();
        assert_eq!(minimum_vertex_cut(&network, 1, 4), Some(BTreeSet::new()));
    }
}
