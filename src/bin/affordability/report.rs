// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Scenario Report Types

use crate::scenarios::{Expectation, Scenario};
use flagship_engine::{Allocation, DerivedMetrics, EngineError, EngineResult, MissionId, Parameters, Schedule};
use serde::Serialize;

// ─── Per-Scenario Outcome ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Published {
        launch_years: [i32; 3],
        simultaneous_ops_years: u32,
        run_lengths: [i64; 3],
        boundaries: [usize; 3],
        mission_totals_musd: [f64; 3],
    },
    Rejected {
        error: String,
        /// Mission whose boundary fell off the horizon, if that was the cause.
        overflow: Option<MissionId>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub label: &'static str,
    pub parameters: Parameters,
    pub outcome: Outcome,
    /// `None` when expectations were not checked.
    pub pass: Option<bool>,
}

impl ScenarioReport {
    pub fn new(
        scenario: &Scenario,
        result: &EngineResult<(Allocation, DerivedMetrics)>,
        check: bool,
    ) -> Self {
        let outcome = match result {
            Ok((allocation, metrics)) => Outcome::Published {
                launch_years: metrics.launch_years,
                simultaneous_ops_years: metrics.simultaneous_ops_years,
                run_lengths: allocation.missions.map(|m| m.run_length),
                boundaries: allocation.boundaries(),
                mission_totals_musd: allocation.missions.map(|m| m.total_musd),
            },
            Err(e) => Outcome::Rejected {
                error: e.to_string(),
                overflow: match e {
                    EngineError::HorizonExceeded { mission, .. } => Some(*mission),
                    _ => None,
                },
            },
        };
        let pass = check.then(|| meets(&scenario.expect, &outcome));
        Self {
            name: scenario.name,
            label: scenario.label,
            parameters: scenario.params,
            outcome,
            pass,
        }
    }

    pub fn summary_line(&self) -> String {
        let status = match self.pass {
            Some(true) => "PASS",
            Some(false) => "FAIL",
            None => "-",
        };
        let detail = match &self.outcome {
            Outcome::Published { launch_years, simultaneous_ops_years, .. } => format!(
                "{} {} {} {:>6}",
                launch_years[0], launch_years[1], launch_years[2], simultaneous_ops_years
            ),
            Outcome::Rejected { error, .. } => error.clone(),
        };
        format!(
            "  {:<16} {:>5} {:>5} {:>5} {:>5} {:>5}   {:<20}  {}",
            self.name,
            self.parameters.envelope_rate,
            self.parameters.mission_costs[0],
            self.parameters.mission_costs[1],
            self.parameters.mission_costs[2],
            self.parameters.lifetime_years,
            detail,
            status,
        )
    }
}

fn meets(expect: &Expectation, outcome: &Outcome) -> bool {
    match (expect, outcome) {
        (Expectation::Launch { years, overlap }, Outcome::Published { launch_years, simultaneous_ops_years, .. }) => {
            years == launch_years && overlap == simultaneous_ops_years
        }
        (Expectation::Overflow(mission), Outcome::Rejected { overflow, .. }) => *overflow == Some(*mission),
        _ => false,
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub baseline: String,
    pub first_year: i32,
    pub horizon_rows: usize,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn tally(reports: &[ScenarioReport]) -> Self {
        let passed = reports.iter().filter(|r| r.pass == Some(true)).count();
        let failed = reports.iter().filter(|r| r.pass == Some(false)).count();
        Self { total: reports.len(), passed, failed }
    }
}

// ─── Schedule Table ─────────────────────────────────────────────────────────

pub fn print_schedule(schedule: &Schedule) {
    println!(
        "    {:>4} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Year", "M1", "M2", "M3", "APD", "Probes", "JWST", "WFIRST", "Total"
    );
    for row in &schedule.rows {
        println!(
            "    {:>4} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
            row.year,
            row.mission(MissionId::M1),
            row.mission(MissionId::M2),
            row.mission(MissionId::M3),
            row.apd,
            row.probes,
            row.jwst,
            row.wfirst,
            row.total(),
        );
    }
}
