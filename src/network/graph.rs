//! Undirected network with stable integer node ids.
//!
//! Nodes live in an arena indexed by id. Each live slot holds the node's
//! neighbour set; a dead slot is `None`. Removing a node purges it from every
//! neighbour set, so an adjacency entry always names a live node.

use std::collections::{BTreeSet, VecDeque};

use log::warn;

/// Node identifier. Input networks number their nodes from 1.
pub type NodeId = u32;

/// Errors raised while building a network from edge lists
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Edge lists have different lengths: ID1 has {sources}, ID2 has {targets}")]
    MismatchedEdgeLists { sources: usize, targets: usize },
    #[error("Edge {index} references node {node}, outside 1..={node_count}")]
    UnknownNode { index: usize, node: NodeId, node_count: usize },
    #[error("Attribute row {row} is malformed: {reason}")]
    MalformedAttributes { row: usize, reason: String },
    #[error("Attribute table covers {rows} nodes, network has {node_count}")]
    MissingAttributes { rows: usize, node_count: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    slots: Vec<Option<BTreeSet<NodeId>>>,
    alive: usize,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Network with isolated nodes `1..=node_count`.
    pub fn with_nodes(node_count: usize) -> Self {
        let mut network = Self::new();
        for id in 1..=node_count as NodeId {
            network.add_node(id);
        }
        network
    }

    /// Build the undirected network over nodes `1..=node_count` from parallel
    /// source/target lists. Direction, duplicates and self-loops are ignored.
    pub fn from_edge_lists(
        node_count: usize,
        sources: &[NodeId],
        targets: &[NodeId],
    ) -> Result<Self, NetworkError> {
        if sources.len() != targets.len() {
            return Err(NetworkError::MismatchedEdgeLists {
                sources: sources.len(),
                targets: targets.len(),
            });
        }

        let mut network = Self::with_nodes(node_count);
        for (index, (&u, &v)) in sources.iter().zip(targets).enumerate() {
            for node in [u, v] {
                if node == 0 || node as usize > node_count {
                    return Err(NetworkError::UnknownNode { index, node, node_count });
                }
            }
            if u == v {
                warn!("Ignoring self-loop on node {} (edge {})", u, index);
                continue;
            }
            network.add_edge(u, v);
        }

        Ok(network)
    }

    fn slot(&self, id: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.slots.get(id as usize).and_then(|s| s.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut BTreeSet<NodeId>> {
        self.slots.get_mut(id as usize).and_then(|s| s.as_mut())
    }

    /// Add an isolated node. Returns false if it was already alive.
    pub fn add_node(&mut self, id: NodeId) -> bool {
        let index = id as usize;
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        if self.slots[index].is_some() {
            return false;
        }
        self.slots[index] = Some(BTreeSet::new());
        self.alive += 1;
        true
    }

    /// Remove a node and every incident edge. Returns false if it was absent.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(neighbors) = self.slots.get_mut(id as usize).and_then(Option::take) else {
            return false;
        };
        for neighbor in neighbors {
            if let Some(set) = self.slot_mut(neighbor) {
                set.remove(&id);
            }
        }
        self.alive -= 1;
        true
    }

    /// Remove a batch of nodes, returning how many were alive.
    pub fn remove_nodes<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        ids.into_iter().filter(|&id| self.remove_node(id)).count()
    }

    /// Add an undirected edge between two live, distinct nodes.
    ///
    /// Returns true only if a new edge was created.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        if u == v || !self.contains_node(u) || !self.contains_node(v) {
            return false;
        }
        let created = self.slot_mut(u).is_some_and(|set| set.insert(v));
        if let Some(set) = self.slot_mut(v) {
            set.insert(u);
        }
        created
    }

    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self.slot_mut(u).is_some_and(|set| set.remove(&v));
        if let Some(set) = self.slot_mut(v) {
            set.remove(&u);
        }
        removed
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.slot(u).is_some_and(|set| set.contains(&v))
    }

    pub fn node_count(&self) -> usize {
        self.alive
    }

    pub fn edge_count(&self) -> usize {
        self.slots.iter().flatten().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Live node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(id, _)| id as NodeId)
    }

    /// Neighbours of `id` in ascending order; empty for a dead node.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.slot(id).into_iter().flatten().copied()
    }

    pub fn neighbor_set(&self, id: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.slot(id)
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.slot(id).map_or(0, BTreeSet::len)
    }

    /// Connected components, each sorted ascending and ordered by smallest id.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut visited = vec![false; self.slots.len()];
        let mut components = Vec::new();

        for start in self.nodes() {
            if visited[start as usize] {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            visited[start as usize] = true;

            while let Some(node) = queue.pop_front() {
                component.push(node);
                for neighbor in self.neighbors(node) {
                    if !visited[neighbor as usize] {
                        visited[neighbor as usize] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// Hop distances from every node in `sources` to each reachable node.
    ///
    /// The result is indexed by node id; `None` marks unreachable or dead nodes.
    pub fn distances_from<I>(&self, sources: I) -> Vec<Option<usize>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut dist = vec![None; self.slots.len()];
        let mut queue = VecDeque::new();

        for source in sources {
            if self.contains_node(source) && dist[source as usize].is_none() {
                dist[source as usize] = Some(0);
                queue.push_back(source);
            }
        }

        while let Some(node) = queue.pop_front() {
            let next = dist[node as usize].map_or(0, |d| d + 1);
            for neighbor in self.neighbors(node) {
                if dist[neighbor as usize].is_none() {
                    dist[neighbor as usize] = Some(next);
                    queue.push_back(neighbor);
                }
            }
        }

        dist
    }

    pub fn shortest_path_length(&self, u: NodeId, v: NodeId) -> Option<usize> {
        if !self.contains_node(v) {
            return None;
        }
        self.distances_from([u])[v as usize]
    }

    pub fn has_path(&self, u: NodeId, v: NodeId) -> bool {
        self.shortest_path_length(u, v).is_some()
    }
}
