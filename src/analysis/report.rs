//! Report generation for disruption experiments.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::config::ExperimentConfig;
use crate::experiment::StrategyRuns;
use crate::network::Network;

use super::aggregate::summarize_experiment;
use super::types::*;

/// Assemble the report of a finished experiment.
pub fn build_report(
    config: &ExperimentConfig,
    master_seed: u64,
    network: &Network,
    results: &[StrategyRuns],
) -> ExperimentReport {
    ExperimentReport {
        metadata: ExperimentMetadata {
            analysis_timestamp: chrono::Utc::now().to_rfc3339(),
            network_file: config.network.display().to_string(),
            node_count: network.node_count(),
            edge_count: network.edge_count(),
            repetitions: config.repetitions,
            master_seed,
            reattach_probability: config.reattach_probability,
            ignore_equipment: config.ignore_equipment,
        },
        strategies: summarize_experiment(results, network.node_count()),
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &ExperimentReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Render the human-readable report
pub fn render_text_report(report: &ExperimentReport) -> String {
    let meta = &report.metadata;
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(80));
    lines.push("                    CRIMINAL NETWORK DISRUPTION EXPERIMENT".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Analysis Date: {}", meta.analysis_timestamp));
    lines.push(format!("Network File: {}", meta.network_file));
    lines.push(format!("Nodes: {}", meta.node_count));
    lines.push(format!("Edges: {}", meta.edge_count));
    lines.push(format!("Runs per Strategy: {}", meta.repetitions));
    lines.push(format!("Master Seed: {}", meta.master_seed));
    lines.push(format!("Reattach Probability: {:.2}", meta.reattach_probability));
    lines.push(format!(
        "Equipment: {}",
        if meta.ignore_equipment { "ignored" } else { "required" }
    ));
    lines.push(String::new());

    lines.push("=".repeat(80));
    lines.push("                          STEPS TO DISMANTLE".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!(
        "{:>4}  {:<24} {:>5} {:>6} {:>6} {:>8} {:>10}",
        "Tag", "Strategy", "Adapt", "Min", "Max", "Mean", "Half-life"
    ));
    for summary in &report.strategies {
        lines.push(format!(
            "{:>4}  {:<24} {:>5} {:>6} {:>6} {:>8.2} {:>10}",
            summary.tag,
            summary.name,
            if summary.adaptation { "yes" } else { "no" },
            summary.min_steps,
            summary.max_steps,
            summary.mean_steps,
            summary
                .half_life_step
                .map_or_else(|| "-".to_string(), |step| step.to_string())
        ));
    }
    lines.push(String::new());

    if let Some(fastest) = report
        .strategies
        .iter()
        .min_by(|a, b| a.mean_steps.total_cmp(&b.mean_steps))
    {
        lines.push(format!(
            "Fastest strategy: ({}) {} with {:.2} removals on average",
            fastest.tag, fastest.name, fastest.mean_steps
        ));
        lines.push(String::new());
    }

    for summary in &report.strategies {
        lines.push("=".repeat(80));
        lines.push(format!("  ({}) {}", summary.tag, summary.name));
        lines.push("=".repeat(80));
        lines.push(String::new());

        lines.push(format!(
            "{:>5} {:>10} {:>11} {:>9} {:>10} {:>10}",
            "Step", "Surviving", "Components", "Largest", "Degree", "Between."
        ));
        for avg in &summary.mean_trajectory {
            lines.push(format!(
                "{:>5} {:>10.2} {:>11.2} {:>9.2} {:>10.4} {:>10.4}",
                avg.step,
                avg.surviving_nodes,
                avg.components,
                avg.largest_component,
                avg.degree_centralization,
                avg.betweenness_centralization
            ));
        }
        lines.push(String::new());
    }

    lines.push("=".repeat(80));
    lines.join("\n")
}

/// Generate human-readable text report
pub fn generate_text_report(report: &ExperimentReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, render_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &ExperimentReport) {
    println!("\n=== DISRUPTION EXPERIMENT SUMMARY ===\n");
    println!("Network: {}", report.metadata.network_file);
    println!("Nodes: {}", report.metadata.node_count);
    println!("Runs per strategy: {}", report.metadata.repetitions);
    println!("Seed: {}", report.metadata.master_seed);

    println!("\nMean removals until dismantled:");
    for summary in &report.strategies {
        println!(
            "  ({:>2}) {:<24} {:>8.2}  [{}..{}]",
            summary.tag, summary.name, summary.mean_steps, summary.min_steps, summary.max_steps
        );
    }

    println!();
}
