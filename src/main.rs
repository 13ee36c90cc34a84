//! Command-line interface for criminal network disruption experiments.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Context, Result};
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use netdisrupt::analysis;
use netdisrupt::config::{ExperimentConfig, DEFAULT_NODE_COUNT};
use netdisrupt::config_loader::{self, ExperimentOverrides};
use netdisrupt::experiment;
use netdisrupt::simulation;
use netdisrupt::targeting::Strategy;

/// Simulate interventions against a criminal network
#[derive(Parser, Debug)]
#[command(name = "netdisrupt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    threads: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every configured strategy repeatedly and write reports
    Run {
        /// Path to the experiment configuration YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Network JSON file (overrides the configuration)
        #[arg(short, long)]
        network: Option<PathBuf>,

        /// Runs per strategy (overrides the configuration)
        #[arg(short, long)]
        repetitions: Option<usize>,

        /// Master seed (overrides the configuration)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output directory for reports
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Run one simulation and print its records as JSON
    Single {
        /// Network JSON file
        #[arg(short, long)]
        network: PathBuf,

        /// Number of actors in the network
        #[arg(long, default_value_t = DEFAULT_NODE_COUNT)]
        node_count: usize,

        /// Strategy tag (0-13)
        #[arg(long, default_value = "0")]
        strategy: u8,

        /// Probability that a former neighbour links to a recruited donor
        #[arg(long, default_value = "0.5")]
        reattach_probability: f64,

        /// Treat equipment as non-essential
        #[arg(long)]
        ignore_equipment: bool,

        /// Seed for the run
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Run { config, network, repetitions, seed, output } => {
            let overrides = ExperimentOverrides { network, repetitions, seed };
            run_experiment(config, overrides, output)
        }
        Commands::Single {
            network,
            node_count,
            strategy,
            reattach_probability,
            ignore_equipment,
            seed,
        } => {
            let strategy = Strategy::try_from(strategy).map_err(|e| eyre!(e))?;
            let mut config = ExperimentConfig::new(network);
            config.node_count = node_count;
            config.repetitions = 1;
            config.strategies = vec![strategy];
            config.reattach_probability = reattach_probability;
            config.ignore_equipment = ignore_equipment;
            config.seed = seed;
            config.validate()?;
            run_single(&config)
        }
    }
}

fn run_experiment(
    config_path: Option<PathBuf>,
    overrides: ExperimentOverrides,
    output: PathBuf,
) -> Result<()> {
    let mut config = match (config_path, &overrides.network) {
        (Some(path), _) => config_loader::load_config(&path)?,
        (None, Some(network)) => ExperimentConfig::new(network.clone()),
        (None, None) => bail!("Either --config or --network must be given"),
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    let master_seed = resolve_seed(config.seed);
    let (network, attributes) = config_loader::load_network(&config.network, config.node_count)?;

    info!(
        "Running {} strategies with {} repetitions each",
        config.strategies.len(),
        config.repetitions
    );
    let results = experiment::run_experiment(&config, master_seed, &network, &attributes)?;
    let report = analysis::build_report(&config, master_seed, &network, &results);

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    analysis::generate_json_report(&report, &output.join("disruption_report.json"))?;
    analysis::generate_text_report(&report, &output.join("disruption_report.txt"))?;
    analysis::print_summary(&report);

    info!("Experiment completed successfully");
    Ok(())
}

fn run_single(config: &ExperimentConfig) -> Result<()> {
    let seed = resolve_seed(config.seed);
    let (network, attributes) = config_loader::load_network(&config.network, config.node_count)?;
    let run_config = config.run_configuration(config.strategies[0]);
    info!("Simulating {} once", run_config.strategy);

    let mut rng = StdRng::seed_from_u64(seed);
    let records = simulation::run(&network, &attributes, &run_config, &mut rng)?;

    let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
    println!("{}", json);
    info!("Network dismantled after {} removals", records.len());
    Ok(())
}

/// Use the configured seed, or draw one and log it so the run can be repeated.
fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        info!("No seed configured; using {}", seed);
        seed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_parsing() {
        let cli = Cli::parse_from([
            "netdisrupt",
            "run",
            "--config", "experiment.yaml",
            "--seed", "7",
        ]);

        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.threads, 0);
        match cli.command {
            Commands::Run { config, network, repetitions, seed, output } => {
                assert_eq!(config, Some(PathBuf::from("experiment.yaml")));
                assert!(network.is_none());
                assert!(repetitions.is_none());
                assert_eq!(seed, Some(7));
                assert_eq!(output, PathBuf::from("results"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_single_parsing() {
        let cli = Cli::parse_from([
            "netdisrupt",
            "single",
            "--network", "criminal.json",
            "--strategy", "7",
            "--ignore-equipment",
            "-j", "2",
        ]);

        assert_eq!(cli.threads, 2);
        match cli.command {
            Commands::Single { network, node_count, strategy, reattach_probability, ignore_equipment, seed } => {
                assert_eq!(network, PathBuf::from("criminal.json"));
                assert_eq!(node_count, 128);
                assert_eq!(strategy, 7);
                assert_eq!(reattach_probability, 0.5);
                assert!(ignore_equipment);
                assert!(seed.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_configured_seed_is_kept() {
        assert_eq!(resolve_seed(Some(42)), 42);
    }
}
