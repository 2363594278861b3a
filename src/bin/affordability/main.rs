// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Headless Scenario Runner
//
// Usage:
//   cargo run --bin affordability                          # All scenarios, shipped table
//   cargo run --bin affordability -- WIDE                  # Filter by name
//   cargo run --bin affordability -- --table DEFAULTS      # Print the year-by-year schedule
//   cargo run --bin affordability -- --json                # JSON report on stdout
//   cargo run --bin affordability -- --data t.txt --config c.json
//
// Set RUST_LOG=debug for per-mission allocation detail.

mod report;
mod scenarios;

use anyhow::{bail, Context, Result};
use flagship_engine::{AllocationConfig, BaselineTable, ChartStyle, FlagshipSimulator};
use report::*;
use scenarios::*;
use std::path::PathBuf;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Default)]
struct CliArgs {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    table: bool,
    json: bool,
    filter: Option<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => cli.data = Some(args.next().context("--data needs a path")?.into()),
            "--config" => cli.config = Some(args.next().context("--config needs a path")?.into()),
            "--table" => cli.table = true,
            "--json" => cli.json = true,
            other if !other.starts_with('-') => cli.filter = Some(other.to_string()),
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(cli)
}

fn load_simulator(cli: &CliArgs) -> Result<FlagshipSimulator> {
    let baseline = match &cli.data {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading baseline {}", path.display()))?;
            BaselineTable::parse(&text).with_context(|| format!("parsing baseline {}", path.display()))?
        }
        None => BaselineTable::slow_ramp().context("parsing embedded baseline")?,
    };
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AllocationConfig::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AllocationConfig::default(),
    };
    Ok(FlagshipSimulator::from_parts(baseline, config, ChartStyle::default())?)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = parse_args()?;
    let sim = load_simulator(&cli)?;
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower) || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };
    if to_run.is_empty() {
        bail!("no scenarios match filter {:?}", cli.filter);
    }

    // Expectations are pinned to the shipped table and default constants.
    let check = cli.data.is_none() && cli.config.is_none();

    let mut reports = Vec::with_capacity(to_run.len());
    let mut schedules = Vec::new();
    for scenario in &to_run {
        let result = sim.evaluate(&scenario.params);
        let report = ScenarioReport::new(scenario, &result, check);
        if let (true, Ok((allocation, _))) = (cli.table, &result) {
            schedules.push((scenario.name, allocation.schedule.clone()));
        }
        reports.push(report);
    }
    let summary = Summary::tally(&reports);

    if cli.json {
        let run = RunReport {
            baseline: cli
                .data
                .as_ref()
                .map_or_else(|| "embedded slow ramp".to_string(), |p| p.display().to_string()),
            first_year: sim.baseline().first_year(),
            horizon_rows: sim.config().horizon_rows.min(sim.baseline().len()),
            summary,
            scenarios: reports,
        };
        println!("{}", serde_json::to_string_pretty(&run)?);
        if run.summary.failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("\n  Flagship Affordability Scenarios");
    println!(
        "  Baseline: {} rows from {} | Running {} scenario(s)\n",
        sim.baseline().len(),
        sim.baseline().first_year(),
        to_run.len()
    );
    println!(
        "  {:<16} {:>5} {:>5} {:>5} {:>5} {:>5}   {:<20}  {}",
        "Scenario", "Wedge", "M1", "M2", "M3", "Life", "Launches   Overlap", "Check"
    );
    println!("  {}", "-".repeat(84));
    for report in &reports {
        println!("{}", report.summary_line());
    }
    println!("  {}", "-".repeat(84));
    println!("  Total: {}  Passed: {}  Failed: {}\n", summary.total, summary.passed, summary.failed);

    for (name, schedule) in &schedules {
        println!("  {name}");
        print_schedule(schedule);
        println!();
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
