//! Freeman centralization indices.
//!
//! Both indices compare every node's centrality with the most central node
//! and normalise by the value a star of the same size would reach, so a star
//! scores 1 and a graph where all nodes are equally central scores 0.

use std::collections::VecDeque;

use crate::network::{Network, NodeId};

/// Degree centrality of each live node: degree / (n - 1).
pub fn degree_centrality(network: &Network) -> Vec<(NodeId, f64)> {
    let n = network.node_count();
    if n <= 1 {
        return network.nodes().map(|id| (id, 0.0)).collect();
    }
    let scale = 1.0 / (n - 1) as f64;
    network
        .nodes()
        .map(|id| (id, network.degree(id) as f64 * scale))
        .collect()
}

/// Unnormalised shortest-path betweenness via Brandes' algorithm.
///
/// Dependencies are accumulated from every source, so each unordered pair
/// of endpoints contributes twice.
pub fn betweenness_centrality(network: &Network) -> Vec<(NodeId, f64)> {
    let ids: Vec<NodeId> = network.nodes().collect();
    let n = ids.len();
    if n == 0 {
        return Vec::new();
    }

    let max_id = ids.last().copied().unwrap_or(0) as usize;
    let mut index_of = vec![usize::MAX; max_id + 1];
    for (i, &id) in ids.iter().enumerate() {
        index_of[id as usize] = i;
    }

    let mut bc = vec![0.0_f64; n];
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut queue = VecDeque::with_capacity(n);

    for s in 0..n {
        for p in predecessors.iter_mut() {
            p.clear();
        }
        sigma.fill(0.0);
        dist.fill(-1);
        delta.fill(0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for neighbor in network.neighbors(ids[v]) {
                let w = index_of[neighbor as usize];
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                bc[w] += delta[w];
            }
        }
    }

    ids.into_iter().zip(bc).collect()
}

/// `(n * max(c) - sum(c)) / (n - 2)` over degree centralities; 0 for n <= 2.
pub fn degree_centralization(network: &Network) -> f64 {
    let n = network.node_count();
    if n <= 2 {
        return 0.0;
    }
    let values: Vec<f64> = degree_centrality(network).into_iter().map(|(_, c)| c).collect();
    centralization(&values, (n - 2) as f64)
}

/// `(n * max(b) - sum(b)) / ((n - 1)^2 (n - 2))` over betweenness; 0 for n <= 2.
pub fn betweenness_centralization(network: &Network) -> f64 {
    let n = network.node_count();
    if n <= 2 {
        return 0.0;
    }
    let values: Vec<f64> = betweenness_centrality(network)
        .into_iter()
        .map(|(_, b)| b)
        .collect();
    let norm = ((n - 1) * (n - 1) * (n - 2)) as f64;
    centralization(&values, norm)
}

fn centralization(values: &[f64], norm: f64) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = values.iter().sum();
    (values.len() as f64 * max - sum) / norm
}
