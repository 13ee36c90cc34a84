//! Aggregation of repeated simulation runs.
//!
//! Runs of the same strategy end after different numbers of steps. To average
//! them step by step, shorter runs are padded with the terminal state of an
//! empty network (every metric zero) up to the length of the longest run.

use crate::experiment::StrategyRuns;
use crate::simulation::SimulationRecord;

use super::types::{StepAverage, StrategySummary};

/// Summarize every strategy of an experiment, in input order.
pub fn summarize_experiment(results: &[StrategyRuns], original_size: usize) -> Vec<StrategySummary> {
    results
        .iter()
        .map(|runs| summarize_strategy(runs, original_size))
        .collect()
}

/// Summarize the runs of one strategy.
///
/// # Arguments
/// * `runs` - All runs of the strategy
/// * `original_size` - Node count of the network the runs started from
///
/// # Returns
/// Step statistics and the padded mean trajectory
pub fn summarize_strategy(runs: &StrategyRuns, original_size: usize) -> StrategySummary {
    let lengths: Vec<usize> = runs.runs.iter().map(Vec::len).collect();
    let min_steps = lengths.iter().copied().min().unwrap_or(0);
    let max_steps = lengths.iter().copied().max().unwrap_or(0);
    let mean_steps = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    let mean_trajectory = mean_trajectory(&runs.runs);
    let half = original_size as f64 / 2.0;
    let half_life_step = mean_trajectory
        .iter()
        .find(|avg| avg.surviving_nodes <= half)
        .map(|avg| avg.step);

    StrategySummary {
        tag: runs.strategy.tag(),
        name: runs.strategy.name().to_string(),
        adaptation: runs.adaptation,
        runs: runs.runs.len(),
        min_steps,
        max_steps,
        mean_steps,
        half_life_step,
        mean_trajectory,
    }
}

/// Step-wise mean of every metric over `runs`. Steps are numbered from 1.
pub fn mean_trajectory(runs: &[Vec<SimulationRecord>]) -> Vec<StepAverage> {
    let max_steps = runs.iter().map(Vec::len).max().unwrap_or(0);
    let count = runs.len() as f64;

    (0..max_steps)
        .map(|i| {
            let mut avg = StepAverage {
                step: i + 1,
                betweenness_centralization: 0.0,
                degree_centralization: 0.0,
                components: 0.0,
                largest_component: 0.0,
                surviving_nodes: 0.0,
            };
            // Runs shorter than i + 1 steps contribute zeros
            for record in runs.iter().filter_map(|run| run.get(i)) {
                avg.betweenness_centralization += record.betweenness_centralization;
                avg.degree_centralization += record.degree_centralization;
                avg.components += record.components as f64;
                avg.largest_component += record.largest_component as f64;
                avg.surviving_nodes += record.surviving_nodes as f64;
            }
            avg.betweenness_centralization /= count;
            avg.degree_centralization /= count;
            avg.components /= count;
            avg.largest_component /= count;
            avg.surviving_nodes /= count;
            avg
        })
        .collect()
}
