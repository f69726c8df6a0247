// src/lib.rs

pub mod chain;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod taskset;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{TaskSetFile, load_and_validate};
use crate::dag::{DagEnumerator, EnumerationLimits};
use crate::taskset::BaselineDag;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - task-set loading (plus CLI overrides)
/// - baseline DAG construction
/// - candidate enumeration and its report
pub fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_and_validate(&args.config)?;
    if let Some(mode) = args.hyperperiod {
        cfg.analysis.hyperperiod = mode;
    }
    if let Some(max) = args.max_candidates {
        cfg.analysis.max_candidates = max;
        cfg.analysis.unbounded = false;
    }

    let model = cfg.build_model()?;
    let baseline = model.create_baseline_dag();
    info!(
        tasks = model.tasks().len(),
        edges = model.edges().len(),
        hyperperiod = baseline.hyperperiod(),
        "baseline DAG ready"
    );

    if args.dry_run {
        // Size the whole space so an oversized one can still be reported.
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::unbounded())?;
        print_dry_run(&cfg, &baseline, &enumerator);
        return Ok(());
    }

    let enumerator = DagEnumerator::new(&baseline, cfg.analysis.limits())?;

    let result = enumerator.enumerate();
    let report = result.report;

    println!(
        "{} candidates: {} accepted, {} cyclic, {} broken dummy chain",
        report.total, report.accepted, report.cyclic, report.broken_dummy_chain
    );
    for candidate in &result.candidates {
        println!(
            "  #{:<6} choices={:?} edges={}",
            candidate.index,
            candidate.choices,
            candidate.dag.edge_count()
        );
    }

    Ok(())
}

/// Dry-run output: tasks, edges, chains and the size of the candidate space.
fn print_dry_run(cfg: &TaskSetFile, baseline: &BaselineDag, enumerator: &DagEnumerator<'_>) {
    println!("rtdag dry-run");
    println!("  analysis.hyperperiod = {:?}", cfg.analysis.hyperperiod);
    println!("  hyperperiod = {}", baseline.hyperperiod());
    match cfg.analysis.limits() {
        EnumerationLimits {
            max_candidates: Some(max),
        } => println!("  analysis.max_candidates = {max}"),
        EnumerationLimits {
            max_candidates: None,
        } => println!("  analysis.max_candidates = unbounded"),
    }
    println!();

    println!("tasks ({}):", baseline.tasks().len());
    for task in baseline.tasks() {
        let deadline = if task.implicit() {
            "implicit".to_string()
        } else {
            task.deadline.to_string()
        };
        println!(
            "  - {} (id {}): period={} wcet={} deadline={} jobs={}",
            task.name,
            task.id,
            task.period,
            task.wcet,
            deadline,
            baseline.jobs_of(task.id).len()
        );
    }

    let counts = enumerator.choice_counts();
    println!("edges ({}):", baseline.edges().len());
    for (edge, count) in baseline.edges().iter().zip(counts) {
        println!(
            "  - {} -> {}: {:?}, jitter={}, realizations={}",
            baseline.task(edge.from).name,
            baseline.task(edge.to).name,
            edge.dependency,
            edge.jitter(),
            count
        );
    }

    if !cfg.chain.is_empty() {
        println!("chains ({}):", cfg.chain.len());
        for chain in &cfg.chain {
            println!("  - {}: {}", chain.name, chain.tasks.join(" -> "));
        }
    }

    let count = enumerator.candidate_count();
    println!();
    println!("candidate DAGs: {count}");
    if !cfg.analysis.limits().admits(count) {
        println!("  exceeds analysis.max_candidates; enumeration would be refused");
    }

    debug!("dry-run complete (no enumeration)");
}
