// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Allocation Engine

//! Converts the envelope rate and three mission costs into a year-by-year
//! spend schedule.
//!
//! Each mission moves through the same phases: dormant, pre-ramp (a share
//! of whatever the legacy flagship wedge leaves over), full-rate
//! construction for `run_length` years, a wind-down year, then dormant
//! again. A successor cannot go full-rate until its predecessor reaches
//! its boundary row, and waits on a standby rate until then.
//!
//! All spend amounts are $M. Rates and costs come in as $B, so rate terms
//! are scaled by 1000.

use crate::baseline::BaselineTable;
use crate::config::AllocationConfig;
use crate::error::{EngineError, EngineResult, LoadError};
use crate::params::to_f64;
use crate::types::{Boundaries, MissionId, Parameters, Schedule};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// $B → $M.
const MUSD_PER_BUSD: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What one mission's pass produced, minus the column itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionAllocation {
    pub mission: MissionId,
    /// Full-rate years before the boundary.
    pub run_length: i64,
    /// Row where this mission launches and its successor takes over.
    pub boundary: usize,
    /// Column sum over the horizon, $M.
    pub total_musd: f64,
}

/// A complete recomputation: the new schedule plus per-mission results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub schedule: Schedule,
    pub missions: [MissionAllocation; 3],
}

impl Allocation {
    pub fn boundaries(&self) -> Boundaries {
        self.missions.map(|m| m.boundary)
    }

    pub fn mission(&self, id: MissionId) -> &MissionAllocation {
        &self.missions[id.index()]
    }
}

// ---------------------------------------------------------------------------
// Run length
// ---------------------------------------------------------------------------

/// Whole years a mission spends at the full rate:
///
/// ```text
/// round((cost - ramp_up * (rate - overhead)) / (rate - overhead))
/// ```
///
/// Halves round to even. The rate must exceed the overhead.
pub fn run_length(envelope_rate: f64, mission_cost: f64, cfg: &AllocationConfig) -> EngineResult<i64> {
    let net_rate = envelope_rate - cfg.overhead_rate_busd;
    if !(envelope_rate.is_finite() && net_rate > 0.0) {
        return Err(EngineError::InvalidEnvelopeRate {
            rate: envelope_rate,
            overhead: cfg.overhead_rate_busd,
        });
    }
    let years = (mission_cost - cfg.ramp_up_cost_busd * net_rate) / net_rate;
    Ok(years.round_ties_even() as i64)
}

/// Spend in every full-rate year, $M.
pub fn full_rate_musd(envelope_rate: f64, cfg: &AllocationConfig) -> f64 {
    MUSD_PER_BUSD * envelope_rate - cfg.reserve_margin_musd
}

// ---------------------------------------------------------------------------
// Per-mission allocation
// ---------------------------------------------------------------------------

/// Compute one mission's column against `schedule`, which must already hold
/// the predecessor's column. Returns the new column (one value per row)
/// and the mission's results; `schedule` itself is left alone.
pub fn allocate_mission(
    schedule: &Schedule,
    mission: MissionId,
    envelope_rate: f64,
    mission_cost: f64,
    prior_boundary: Option<usize>,
    cfg: &AllocationConfig,
) -> EngineResult<(Vec<f64>, MissionAllocation)> {
    if !mission_cost.is_finite() {
        return Err(EngineError::InvalidMissionCost { mission, cost: mission_cost });
    }
    let horizon = schedule.len();
    let n = run_length(envelope_rate, mission_cost, cfg)?;
    let full_rate = full_rate_musd(envelope_rate, cfg);
    let policy = cfg.policy(mission);
    let mut column = vec![0.0; horizon];

    // Pre-ramp: share of the legacy wedge left after JWST and WFIRST.
    for row in clamp(cfg.pre_ramp_start_row..cfg.full_rate_start_row(), horizon) {
        let leftover = cfg.legacy_wedge_musd - schedule.rows[row].legacy_flagships();
        column[row] = policy.pre_ramp_share * leftover;
    }

    let boundary = match (prior_boundary, mission.predecessor()) {
        (Some(prior), Some(predecessor)) => {
            let boundary = checked_boundary(mission, prior as i64 + n, horizon)?;
            if prior >= horizon {
                return Err(EngineError::HorizonExceeded { mission: predecessor, boundary: prior as i64, horizon });
            }
            if prior < cfg.full_rate_start_row() {
                log::warn!("{mission}: {predecessor} hands off at row {prior}, inside the pre-ramp window");
            }
            // Successors keep their first pre-ramp year and idle on standby
            // until the predecessor hands off.
            fill(&mut column, cfg.pre_ramp_start_row + 1..prior, policy.standby_rate_musd);
            column[prior] = MUSD_PER_BUSD * envelope_rate
                - schedule.rows[prior].mission(predecessor)
                - cfg.handoff_margin_musd;
            fill(&mut column, prior + 1..boundary, full_rate);
            // The wind-down year belongs to the next hand-off, not to us.
            fill(&mut column, boundary..horizon, 0.0);
            boundary
        }
        (None, None) => {
            let start = cfg.full_rate_start_row();
            let boundary = checked_boundary(mission, start as i64 + n, horizon)?;
            fill(&mut column, start..boundary, full_rate);
            column[boundary] = cfg.tail_fraction * full_rate;
            boundary
        }
        (None, Some(predecessor)) => {
            return Err(EngineError::Config(format!("{mission} requires the {predecessor} boundary")));
        }
        (Some(prior), None) => {
            return Err(EngineError::Config(format!(
                "{mission} has no predecessor, got prior boundary {prior}"
            )));
        }
    };

    if n < 1 {
        log::warn!("{mission}: run length {n} leaves no full-rate years (cost {mission_cost} $B)");
    }

    let total_musd = column.iter().sum::<f64>();
    log::debug!(
        "{mission}: runs {n} years at {full_rate:.1} $M, boundary row {boundary} (year {:?}), total {total_musd:.1} $M",
        schedule.year(boundary)
    );

    Ok((
        column,
        MissionAllocation { mission, run_length: n, boundary, total_musd },
    ))
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

/// Build a new schedule from `baseline` and allocate M1, M2, M3 in order.
pub fn allocate(
    baseline: &BaselineTable,
    params: &Parameters,
    cfg: &AllocationConfig,
) -> EngineResult<Allocation> {
    let horizon = cfg.horizon_rows.min(baseline.len());
    let required = cfg.full_rate_start_row() + 1;
    if horizon < required {
        return Err(LoadError::TooShort { rows: horizon, required }.into());
    }

    let rate = to_f64(params.envelope_rate);
    let mut schedule = baseline.to_schedule(horizon);

    let m1 = apply_mission(&mut schedule, MissionId::M1, rate, params, None, cfg)?;
    let m2 = apply_mission(&mut schedule, MissionId::M2, rate, params, Some(m1.boundary), cfg)?;
    let m3 = apply_mission(&mut schedule, MissionId::M3, rate, params, Some(m2.boundary), cfg)?;

    Ok(Allocation { schedule, missions: [m1, m2, m3] })
}

fn apply_mission(
    schedule: &mut Schedule,
    mission: MissionId,
    rate: f64,
    params: &Parameters,
    prior_boundary: Option<usize>,
    cfg: &AllocationConfig,
) -> EngineResult<MissionAllocation> {
    let cost = to_f64(params.cost(mission));
    let (column, result) = allocate_mission(schedule, mission, rate, cost, prior_boundary, cfg)?;
    schedule.set_column(mission, &column);
    Ok(result)
}

// ---------------------------------------------------------------------------
// Row helpers
// ---------------------------------------------------------------------------

fn checked_boundary(mission: MissionId, boundary: i64, horizon: usize) -> EngineResult<usize> {
    if boundary < 0 || boundary >= horizon as i64 {
        return Err(EngineError::HorizonExceeded { mission, boundary, horizon });
    }
    Ok(boundary as usize)
}

/// Intersect `range` with `0..len`; inverted ranges come back empty.
fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

fn fill(column: &mut [f64], range: Range<usize>, value: f64) {
    let range = clamp(range, column.len());
    column[range].fill(value);
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterRanges;
    use rust_decimal_macros::dec;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn shipped() -> BaselineTable {
        BaselineTable::slow_ramp().expect("test: shipped table should parse")
    }

    fn default_allocation() -> Allocation {
        allocate(&shipped(), &Parameters::default(), &AllocationConfig::default())
            .expect("test: defaults should fit the horizon")
    }

    #[test]
    fn test_run_length_defaults() {
        let cfg = AllocationConfig::default();
        assert_eq!(run_length(0.6, 10.0, &cfg).unwrap(), 17);
        assert_eq!(run_length(0.6, 6.0, &cfg).unwrap(), 10);
        assert_eq!(run_length(0.6, 5.0, &cfg).unwrap(), 8);
        assert_eq!(run_length(0.5, 20.0, &cfg).unwrap(), 41);
        assert_eq!(run_length(2.0, 3.0, &cfg).unwrap(), 1);
    }

    #[test]
    fn test_run_length_rejects_rate_at_or_below_overhead() {
        let cfg = AllocationConfig::default();
        assert!(matches!(run_length(0.02, 10.0, &cfg), Err(EngineError::InvalidEnvelopeRate { .. })));
        assert!(run_length(0.01, 10.0, &cfg).is_err());
        assert!(run_length(f64::NAN, 10.0, &cfg).is_err());
        assert!(run_length(f64::INFINITY, 10.0, &cfg).is_err());
    }

    #[test]
    fn test_full_rate_keeps_reserve() {
        let cfg = AllocationConfig::default();
        assert_eq!(full_rate_musd(0.6, &cfg), 580.0);
        assert_eq!(full_rate_musd(2.0, &cfg), 1980.0);
    }

    #[test]
    fn test_default_boundaries() {
        let a = default_allocation();
        assert_eq!(a.boundaries(), [24, 34, 42]);
        assert_eq!(a.missions.map(|m| m.run_length), [17, 10, 8]);
    }

    #[test]
    fn test_mission_one_phases() {
        let a = default_allocation();
        let m1 = a.schedule.column(MissionId::M1);
        assert_eq!(m1[0], 0.0);
        let pre_ramp = [15.0, 20.0, 55.0, 110.0, 175.0, 295.0];
        for (row, expected) in (1..7).zip(pre_ramp) {
            assert!(approx(m1[row], expected), "row {row}: {}", m1[row]);
        }
        assert!(m1[7..24].iter().all(|&v| v == 580.0));
        assert!(approx(m1[24], 174.0));
        assert!(m1[25..].iter().all(|&v| v == 0.0));
        assert!(approx(a.mission(MissionId::M1).total_musd, 10_704.0));
    }

    #[test]
    fn test_mission_two_hands_off_from_one() {
        let a = default_allocation();
        let m2 = a.schedule.column(MissionId::M2);
        assert_eq!(m2[0], 0.0);
        assert!(approx(m2[1], 10.0));
        assert!(m2[2..24].iter().all(|&v| v == 70.0));
        // 600 - M1 wind-down (174) - 70
        assert!(approx(m2[24], 356.0));
        assert!(m2[25..34].iter().all(|&v| v == 580.0));
        assert!(m2[34..].iter().all(|&v| v == 0.0));
        assert!(approx(a.mission(MissionId::M2).total_musd, 7_126.0));
    }

    #[test]
    fn test_mission_three_uses_smaller_share_and_standby() {
        let a = default_allocation();
        let m3 = a.schedule.column(MissionId::M3);
        assert!(approx(m3[1], 5.0));
        assert!(m3[2..34].iter().all(|&v| v == 50.0));
        // M2 is dormant at its own boundary, so only the margin comes off.
        assert!(approx(m3[34], 530.0));
        assert!(m3[35..42].iter().all(|&v| v == 580.0));
        assert!(m3[42..].iter().all(|&v| v == 0.0));
        assert!(approx(a.mission(MissionId::M3).total_musd, 6_195.0));
    }

    #[test]
    fn test_hand_off_year_stays_inside_envelope() {
        let a = default_allocation();
        let b1 = a.mission(MissionId::M1).boundary;
        let row = &a.schedule.rows[b1];
        assert!(approx(row.mission(MissionId::M1) + row.mission(MissionId::M2), 600.0 - 70.0));
    }

    #[test]
    fn test_full_rate_row_count_equals_run_length() {
        let cfg = AllocationConfig::default();
        let ranges = ParameterRanges::default();
        let schedule = shipped().to_schedule(cfg.horizon_rows);
        let mut checked = 0;
        for i in 0..ranges.envelope_rate.grid_len() {
            let rate = to_f64(ranges.envelope_rate.grid_point(i).unwrap());
            let full = full_rate_musd(rate, &cfg);
            let cost_range = ranges.cost(MissionId::M1);
            for k in 0..cost_range.grid_len() {
                let cost = to_f64(cost_range.grid_point(k).unwrap());
                let (col, result) = match allocate_mission(&schedule, MissionId::M1, rate, cost, None, &cfg) {
                    Ok(r) => r,
                    Err(EngineError::HorizonExceeded { mission: MissionId::M1, .. }) => continue,
                    Err(e) => panic!("rate {rate} cost {cost}: {e}"),
                };
                let count = col.iter().filter(|&&v| v == full).count() as i64;
                assert_eq!(count, result.run_length, "rate {rate} cost {cost}");
                checked += 1;
            }
        }
        // 0.5 $B/yr with a 20 $B M1 is the longest run that still fits.
        let (_, longest) = allocate_mission(&schedule, MissionId::M1, 0.5, 20.0, None, &cfg).unwrap();
        assert_eq!(longest.run_length, 41);
        assert!(checked > 500, "only {checked} grid points fit");
    }

    #[test]
    fn test_successor_without_prior_boundary_rejected() {
        let schedule = shipped().to_schedule(50);
        let cfg = AllocationConfig::default();
        for mission in [MissionId::M2, MissionId::M3] {
            let err = allocate_mission(&schedule, mission, 0.6, 6.0, None, &cfg).unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{mission}: {err:?}");
        }
    }

    #[test]
    fn test_mission_one_with_prior_boundary_rejected() {
        let schedule = shipped().to_schedule(50);
        let err = allocate_mission(&schedule, MissionId::M1, 0.6, 10.0, Some(40), &AllocationConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)), "{err:?}");
    }

    #[test]
    fn test_horizon_overflow_reported() {
        let mut p = Parameters::default();
        p.envelope_rate = dec!(0.5);
        p.mission_costs = [dec!(20), dec!(20), dec!(20)];
        let err = allocate(&shipped(), &p, &AllocationConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::HorizonExceeded { mission: MissionId::M2, boundary: 89, horizon: 50 }
        );
    }

    #[test]
    fn test_mission_one_overflow_reported() {
        let cfg = AllocationConfig { horizon_rows: 20, ..AllocationConfig::default() };
        let err = allocate(&shipped(), &Parameters::default(), &cfg).unwrap_err();
        assert!(matches!(err, EngineError::HorizonExceeded { mission: MissionId::M1, boundary: 24, horizon: 20 }));
    }

    #[test]
    fn test_inverted_standby_range_fills_nothing() {
        let schedule = shipped().to_schedule(50);
        let cfg = AllocationConfig::default();
        // Predecessor boundary inside the pre-ramp window.
        let (col, result) = allocate_mission(&schedule, MissionId::M2, 0.6, 6.0, Some(1), &cfg).unwrap();
        assert_eq!(result.boundary, 11);
        // 600 - 0 - 70 at the hand-off row, then full rate.
        assert!(approx(col[1], 530.0));
        assert!(col[2..11].iter().all(|&v| v == 580.0));
        assert!(col[11..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_run_length_collapses_onto_prior_boundary() {
        let schedule = shipped().to_schedule(50);
        let cfg = AllocationConfig::default();
        // cost equal to the ramp-up share rounds to zero full-rate years
        let (col, result) = allocate_mission(&schedule, MissionId::M3, 0.6, 0.348, Some(30), &cfg).unwrap();
        assert_eq!(result.run_length, 0);
        assert_eq!(result.boundary, 30);
        assert!(col[30..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let schedule = shipped().to_schedule(50);
        let err = allocate_mission(&schedule, MissionId::M1, 0.6, f64::NAN, None, &AllocationConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidMissionCost { mission: MissionId::M1, .. }));
    }

    #[test]
    fn test_short_baseline_rejected() {
        let table = BaselineTable::parse("Year APD JWST WFIRST\n2020 700 0 0\n2021 700 0 0\n").unwrap();
        let err = allocate(&table, &Parameters::default(), &AllocationConfig::default()).unwrap_err();
        assert_eq!(err, EngineError::Load(LoadError::TooShort { rows: 2, required: 8 }));
    }

    #[test]
    fn test_background_columns_untouched() {
        let table = shipped();
        let a = default_allocation();
        for (row, base) in a.schedule.rows.iter().zip(table.rows()) {
            assert_eq!(row.year, base.year);
            assert_eq!(row.apd.to_bits(), base.apd.to_bits());
            assert_eq!(row.probes.to_bits(), base.probes.to_bits());
            assert_eq!(row.jwst.to_bits(), base.jwst.to_bits());
            assert_eq!(row.wfirst.to_bits(), base.wfirst.to_bits());
        }
    }
}
