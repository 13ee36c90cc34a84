//! # Netdisrupt - Resilience simulation for criminal networks
//!
//! This library simulates law-enforcement interventions against a criminal
//! network and measures how quickly each intervention strategy dismantles it.
//!
//! ## Overview
//!
//! The network is an undirected graph of actors. Every actor holds some of
//! eight resource categories (money, drugs, premises, equipment, precursors,
//! information, skills and labour). A connected group of actors can operate
//! only while it holds every category between them. One simulation run
//! repeatedly removes the actor chosen by a targeting strategy. The network
//! may then repair itself by recruiting donors, and every group left missing
//! a resource is pruned. The run stops once no actor survives.
//!
//! ## Key Features
//!
//! - **Fourteen strategies**: degree, betweenness, minimum vertex cut,
//!   resource holders, random removal and hybrids, with or without adaptation
//! - **Adaptive repair**: deficient groups recruit the nearest capable donor
//! - **Structural metrics**: degree and betweenness centralization per step
//! - **Reproducible**: every random decision draws from an injected generator
//! - **Parallel**: repetitions of a strategy run concurrently on rayon
//!
//! ## Architecture
//!
//! - `network`: Graph storage and per-node resource attributes
//! - `targeting`: Strategy catalogue, target selectors and vertex cuts
//! - `adaptation`: Donor recruitment for deficient components
//! - `simulation`: The removal, repair and prune loop of a single run
//! - `experiment`: Repeated runs of every configured strategy
//! - `analysis`: Centralization indices, aggregation and reports
//! - `config`: Experiment configuration structures and validation
//! - `config_loader`: YAML configuration and JSON network loading
//! - `utils`: Weighted random choice
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use netdisrupt::{config_loader, simulation, targeting::Strategy};
//! use rand::SeedableRng;
//!
//! let (network, attributes) = config_loader::load_network(Path::new("criminal.json"), 128)?;
//! let config = simulation::RunConfiguration::for_strategy(Strategy::CutSet, 0.5, false);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(2016);
//!
//! let records = simulation::run(&network, &attributes, &config, &mut rng)?;
//! println!("Dismantled after {} removals", records.len());
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! network: criminal.json
//! node_count: 128
//! repetitions: 100
//! strategies: [0, 1, 2, 7, 8]
//! reattach_probability: 0.5
//! ignore_equipment: false
//! seed: 2016
//! ```
//!
//! ## Error Handling
//!
//! Library operations return typed errors built with `thiserror`
//! (`NetworkError`, `SimulationError`, `ValidationError`). File loading and
//! report writing return `color_eyre::Result` with context attached.

pub mod adaptation;
pub mod analysis;
pub mod config;
pub mod config_loader;
pub mod experiment;
pub mod network;
pub mod simulation;
pub mod targeting;
pub mod utils;

pub use config::{ExperimentConfig, ValidationError};
pub use network::{AttributeTable, Network, NetworkError, NodeId};
pub use simulation::{RunConfiguration, SimulationError, SimulationRecord};
pub use targeting::Strategy;
