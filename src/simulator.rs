// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Simulator State

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::allocation::{self, Allocation};
use crate::baseline::BaselineTable;
use crate::chart::ChartFrame;
use crate::config::{AllocationConfig, ChartStyle};
use crate::error::{EngineResult, LoadError};
use crate::metrics::{self, DerivedMetrics};
use crate::params::{to_f64, ParameterRanges};
use crate::types::{MissionId, Parameters};

// ─── Snapshot ───────────────────────────────────────────────────────────────

/// One published state. Replaced wholesale on every successful change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Bumped on every publish so observers can skip frames they have seen.
    pub revision: u64,
    pub parameters: Parameters,
    pub allocation: Allocation,
    pub metrics: DerivedMetrics,
}

/// Allocation followed by derived metrics, without publishing anything.
pub fn run_pipeline(
    baseline: &BaselineTable,
    params: &Parameters,
    cfg: &AllocationConfig,
) -> EngineResult<(Allocation, DerivedMetrics)> {
    let allocation = allocation::allocate(baseline, params, cfg)?;
    let metrics = metrics::for_allocation(&allocation, to_f64(params.lifetime_years))?;
    Ok((allocation, metrics))
}

// ─── FlagshipSimulator struct ───────────────────────────────────────────────

#[wasm_bindgen]
pub struct FlagshipSimulator {
    pub(crate) baseline: BaselineTable,
    pub(crate) config: AllocationConfig,
    pub(crate) style: ChartStyle,
    pub(crate) ranges: ParameterRanges,
    pub(crate) params: Parameters,
    pub(crate) published: Snapshot,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl FlagshipSimulator {
    /// Build a simulator and publish the default scenario. Fails if the
    /// configuration or baseline cannot support the defaults.
    pub fn from_parts(baseline: BaselineTable, config: AllocationConfig, style: ChartStyle) -> EngineResult<Self> {
        config.validate()?;
        let required = config.full_rate_start_row() + 1;
        if baseline.len() < required {
            return Err(LoadError::TooShort { rows: baseline.len(), required }.into());
        }
        let ranges = ParameterRanges::default();
        let params = ranges.defaults();
        let (allocation, metrics) = run_pipeline(&baseline, &params, &config)?;
        log::info!(
            "simulator ready: {} baseline rows from {}, launch years {:?}",
            baseline.len(),
            baseline.first_year(),
            metrics.launch_years
        );
        Ok(Self {
            baseline,
            config,
            style,
            ranges,
            params,
            published: Snapshot { revision: 0, parameters: params, allocation, metrics },
        })
    }

    /// Shipped slow-ramp table with default configuration and styling.
    pub fn with_defaults() -> EngineResult<Self> {
        Self::from_parts(BaselineTable::slow_ramp()?, AllocationConfig::default(), ChartStyle::default())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.published
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn ranges(&self) -> &ParameterRanges {
        &self.ranges
    }

    pub fn baseline(&self) -> &BaselineTable {
        &self.baseline
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    pub fn frame(&self) -> ChartFrame {
        ChartFrame::build(&self.published, &self.style, self.baseline.has_probes())
    }

    /// Evaluate `params` without publishing.
    pub fn evaluate(&self, params: &Parameters) -> EngineResult<(Allocation, DerivedMetrics)> {
        self.ranges.validate(params)?;
        run_pipeline(&self.baseline, params, &self.config)
    }

    /// Run the full pipeline for `next` and publish it. On any error the
    /// previous snapshot and parameters stay in place.
    pub fn apply(&mut self, next: Parameters) -> EngineResult<&Snapshot> {
        let (allocation, metrics) = match self.evaluate(&next) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("recompute rejected, keeping revision {}: {e}", self.published.revision);
                return Err(e);
            }
        };
        Ok(self.publish(next, allocation, metrics))
    }

    pub fn set_envelope_rate_core(&mut self, value: f64) -> EngineResult<&Snapshot> {
        let rate = self.ranges.envelope_rate.accept(value)?;
        let mut next = self.params;
        next.envelope_rate = rate;
        self.apply(next)
    }

    pub fn set_mission_cost_core(&mut self, mission: MissionId, value: f64) -> EngineResult<&Snapshot> {
        let cost = self.ranges.cost(mission).accept(value)?;
        let mut next = self.params;
        next.mission_costs[mission.index()] = cost;
        self.apply(next)
    }

    /// Lifetime does not feed the allocation, so only the metrics are
    /// refreshed, against the boundaries of the allocation currently
    /// published.
    pub fn set_lifetime_core(&mut self, value: f64) -> EngineResult<&Snapshot> {
        let lifetime = self.ranges.lifetime_years.accept(value)?;
        let mut next = self.params;
        next.lifetime_years = lifetime;
        let allocation = self.published.allocation.clone();
        let metrics = metrics::for_allocation(&allocation, to_f64(lifetime))?;
        Ok(self.publish(next, allocation, metrics))
    }

    /// Every control back to its default position.
    pub fn reset_core(&mut self) -> EngineResult<&Snapshot> {
        self.apply(self.ranges.defaults())
    }

    fn publish(&mut self, params: Parameters, allocation: Allocation, metrics: DerivedMetrics) -> &Snapshot {
        let revision = self.published.revision + 1;
        log::info!(
            "revision {revision}: wedge {} $B/yr, costs {:?} $B, launches {:?}, {} years simultaneous",
            params.envelope_rate,
            params.mission_costs,
            metrics.launch_years,
            metrics.simultaneous_ops_years
        );
        self.params = params;
        self.published = Snapshot { revision, parameters: params, allocation, metrics };
        &self.published
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rust_decimal_macros::dec;

    fn sim() -> FlagshipSimulator {
        FlagshipSimulator::with_defaults().expect("test: defaults should load")
    }

    #[test]
    fn test_starts_on_defaults() {
        let s = sim();
        let snap = s.snapshot();
        assert_eq!(snap.revision, 0);
        assert_eq!(snap.parameters, Parameters::default());
        assert_eq!(snap.metrics.launch_years, [2044, 2054, 2062]);
        assert_eq!(snap.allocation.boundaries(), [24, 34, 42]);
    }

    #[test]
    fn test_each_change_bumps_revision() {
        let mut s = sim();
        s.set_envelope_rate_core(0.8).unwrap();
        s.set_mission_cost_core(MissionId::M2, 7.5).unwrap();
        s.set_lifetime_core(12.0).unwrap();
        assert_eq!(s.snapshot().revision, 3);
        assert_eq!(s.parameters().envelope_rate, dec!(0.8));
        assert_eq!(s.parameters().mission_costs[1], dec!(7.5));
        assert_eq!(s.parameters().lifetime_years, dec!(12));
    }

    #[test]
    fn test_failed_recompute_keeps_published_state() {
        let mut s = sim();
        // Boundaries 27, 39, 49: the last row still fits.
        s.set_envelope_rate_core(0.5).unwrap();
        let before = s.snapshot().clone();

        // M2 now needs 41 full-rate years after row 27.
        let err = s.set_mission_cost_core(MissionId::M2, 20.0).unwrap_err();
        assert_eq!(err, EngineError::HorizonExceeded { mission: MissionId::M2, boundary: 68, horizon: 50 });
        assert_eq!(s.snapshot(), &before);
        assert_eq!(s.parameters(), &before.parameters);
    }

    #[test]
    fn test_out_of_range_value_rejected_without_publish() {
        let mut s = sim();
        assert!(s.set_envelope_rate_core(0.1).is_err());
        assert!(s.set_lifetime_core(40.0).is_err());
        assert!(s.set_mission_cost_core(MissionId::M3, 2.0).is_err());
        assert_eq!(s.snapshot().revision, 0);
    }

    #[test]
    fn test_lifetime_change_uses_current_boundaries() {
        let mut s = sim();
        s.set_mission_cost_core(MissionId::M1, 5.0).unwrap();
        let moved = s.snapshot().metrics.launch_years;
        assert_ne!(moved, [2044, 2054, 2062]);

        s.set_lifetime_core(20.0).unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.metrics.launch_years, moved);
        assert_eq!(snap.metrics.ops_windows[0].start, moved[0] as f64);
        assert_eq!(snap.metrics.ops_windows[0].end, moved[0] as f64 + 20.0);

        let (_, full) = s.evaluate(s.parameters()).unwrap();
        assert_eq!(snap.metrics, full);
    }

    #[test]
    fn test_lifetime_change_leaves_schedule_alone() {
        let mut s = sim();
        let schedule = s.snapshot().allocation.schedule.clone();
        s.set_lifetime_core(30.0).unwrap();
        assert_eq!(s.snapshot().allocation.schedule, schedule);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = sim();
        s.set_envelope_rate_core(1.5).unwrap();
        s.reset_core().unwrap();
        assert_eq!(s.parameters(), &Parameters::default());
        assert_eq!(s.snapshot().metrics.launch_years, [2044, 2054, 2062]);
    }

    #[test]
    fn test_rejects_baseline_shorter_than_pre_ramp() {
        let table = BaselineTable::parse("Year APD JWST WFIRST\n2020 700 0 0\n").unwrap();
        let err = FlagshipSimulator::from_parts(table, AllocationConfig::default(), ChartStyle::default())
            .err()
            .expect("test: short table should fail");
        assert!(matches!(err, EngineError::Load(LoadError::TooShort { .. })));
    }
}
