//! Experiment driver.
//!
//! Runs every configured strategy the configured number of times. Runs are
//! independent: each gets its own copy of the network and its own generator
//! seeded from the master seed, the strategy tag and the repetition index,
//! so results do not depend on how rayon schedules them.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::ExperimentConfig;
use crate::network::{AttributeTable, Network};
use crate::simulation::{self, SimulationError, SimulationRecord};
use crate::targeting::Strategy;

/// All runs of one strategy
#[derive(Debug, Clone)]
pub struct StrategyRuns {
    pub strategy: Strategy,
    pub adaptation: bool,
    pub runs: Vec<Vec<SimulationRecord>>,
}

/// Seed for one run, derived from the experiment's master seed.
pub fn run_seed(master: u64, strategy: &Strategy, repetition: usize) -> u64 {
    master ^ (u64::from(strategy.tag()) << 48) ^ repetition as u64
}

/// Run every configured strategy `config.repetitions` times.
pub fn run_experiment(
    config: &ExperimentConfig,
    master_seed: u64,
    network: &Network,
    attributes: &AttributeTable,
) -> Result<Vec<StrategyRuns>, SimulationError> {
    config
        .strategies
        .iter()
        .map(|strategy| -> Result<StrategyRuns, SimulationError> {
            let run_config = config.run_configuration(*strategy);
            info!(
                "Simulating {} ({} runs, adaptation {})",
                strategy,
                config.repetitions,
                if run_config.adaptation { "on" } else { "off" }
            );

            let runs = (0..config.repetitions)
                .into_par_iter()
                .map(|repetition| {
                    let mut rng = StdRng::seed_from_u64(run_seed(master_seed, strategy, repetition));
                    simulation::run(network, attributes, &run_config, &mut rng)
                })
                .collect::<Result<Vec<_>, _>>()?;

            let steps: usize = runs.iter().map(Vec::len).sum();
            info!(
                "Finished {}: {:.1} steps per run on average",
                strategy,
                steps as f64 / runs.len().max(1) as f64
            );

            Ok(StrategyRuns {
                strategy: run_config.strategy,
                adaptation: run_config.adaptation,
                runs,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::AttributeVector;

    fn fixture() -> (Network, AttributeTable) {
        let network = Network::from_edge_lists(
            8,
            &[1, 1, 1, 2, 2, 3, 5, 5, 5, 6, 6, 7, 1, 2],
            &[2, 3, 4, 3, 4, 4, 6, 7, 8, 7, 8, 8, 5, 6],
        )
        .unwrap();
        let mut rows = vec![AttributeVector::default(); 8];
        rows[0] = AttributeVector::new([true, true, true, true, false, false, false, false]);
        rows[4] = AttributeVector::new([false, false, false, false, true, true, true, true]);
        rows[5] = AttributeVector::new([true; 8]);
        (network, AttributeTable::new(rows))
    }

    #[test]
    fn test_experiment_is_reproducible() {
        let (network, attributes) = fixture();
        let mut config = ExperimentConfig::new("unused.json");
        config.node_count = 8;
        config.repetitions = 6;

        let a = run_experiment(&config, 1234, &network, &attributes).unwrap();
        let b = run_experiment(&config, 1234, &network, &attributes).unwrap();

        assert_eq!(a.len(), 14);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.strategy, y.strategy);
            assert_eq!(x.runs, y.runs);
            assert_eq!(x.runs.len(), 6);
        }
    }

    #[test]
    fn test_adaptation_follows_strategy() {
        let (network, attributes) = fixture();
        let mut config = ExperimentConfig::new("unused.json");
        config.repetitions = 1;
        config.strategies = vec![Strategy::CutSet, Strategy::CutSetNoAdapt];

        let results = run_experiment(&config, 5, &network, &attributes).unwrap();
        assert!(results[0].adaptation);
        assert!(!results[1].adaptation);
    }

    #[test]
    fn test_run_seeds_differ() {
        let a = run_seed(1, &Strategy::CutSet, 0);
        let b = run_seed(1, &Strategy::CutSet, 1);
        let c = run_seed(1, &Strategy::MaxDegree, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
