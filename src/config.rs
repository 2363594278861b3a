// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Configuration

//! Allocation constants and chart styling.
//!
//! Every offset and dollar figure the allocation formulas use lives here,
//! so horizon length, pre-ramp length and margins can change without
//! touching `allocation.rs`. Both structs load from JSON; absent fields
//! keep their defaults.

use crate::error::{EngineError, EngineResult};
use crate::types::MissionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MissionPolicy
// ---------------------------------------------------------------------------

/// Per-mission knobs that differ between M1, M2 and M3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionPolicy {
    /// Fraction of the leftover legacy wedge this mission takes during the
    /// pre-ramp window.
    pub pre_ramp_share: f64,
    /// $M per year while waiting on the predecessor. Unused for M1.
    pub standby_rate_musd: f64,
}

// ---------------------------------------------------------------------------
// AllocationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Rows addressable by the engine, counted from the first baseline row.
    pub horizon_rows: usize,
    /// First row of the shared pre-ramp window.
    pub pre_ramp_start_row: usize,
    /// Length of the pre-ramp window in years.
    pub pre_ramp_years: usize,
    /// Legacy flagship wedge the pre-ramp shares are carved from, $M.
    pub legacy_wedge_musd: f64,
    /// Fixed ramp-up cost subtracted from each mission's total, $B.
    pub ramp_up_cost_busd: f64,
    /// Overhead taken off the envelope rate before amortizing, $B/yr.
    pub overhead_rate_busd: f64,
    /// Reserve held back from every full-rate year, $M.
    pub reserve_margin_musd: f64,
    /// Margin held back in a successor's hand-off year, $M.
    pub handoff_margin_musd: f64,
    /// Fraction of the full rate spent in M1's wind-down year.
    pub tail_fraction: f64,
    /// M1, M2, M3.
    pub missions: [MissionPolicy; 3],
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            horizon_rows: 50,
            pre_ramp_start_row: 1,
            pre_ramp_years: 6,
            legacy_wedge_musd: 700.0,
            ramp_up_cost_busd: 0.6,
            overhead_rate_busd: 0.02,
            reserve_margin_musd: 20.0,
            handoff_margin_musd: 70.0,
            tail_fraction: 0.3,
            missions: [
                MissionPolicy { pre_ramp_share: 1.0 / 2.0, standby_rate_musd: 0.0 },
                MissionPolicy { pre_ramp_share: 1.0 / 3.0, standby_rate_musd: 70.0 },
                MissionPolicy { pre_ramp_share: 1.0 / 6.0, standby_rate_musd: 50.0 },
            ],
        }
    }
}

impl AllocationConfig {
    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn policy(&self, id: MissionId) -> &MissionPolicy {
        &self.missions[id.index()]
    }

    /// First row after the pre-ramp window; M1's full-rate phase starts here.
    pub fn full_rate_start_row(&self) -> usize {
        self.pre_ramp_start_row + self.pre_ramp_years
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.horizon_rows <= self.full_rate_start_row() {
            return Err(EngineError::Config(format!(
                "horizon_rows {} must exceed the pre-ramp window end {}",
                self.horizon_rows,
                self.full_rate_start_row()
            )));
        }
        if !(self.overhead_rate_busd.is_finite() && self.overhead_rate_busd >= 0.0) {
            return Err(EngineError::Config("overhead_rate_busd must be finite and >= 0".into()));
        }
        if !(0.0..=1.0).contains(&self.tail_fraction) {
            return Err(EngineError::Config("tail_fraction must be within [0, 1]".into()));
        }
        for (id, policy) in MissionId::ALL.iter().zip(&self.missions) {
            if !(0.0..=1.0).contains(&policy.pre_ramp_share) {
                return Err(EngineError::Config(format!("{id} pre_ramp_share must be within [0, 1]")));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChartStyle
// ---------------------------------------------------------------------------

/// Fill for one stacked layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub color: String,
    pub alpha: f64,
}

impl LayerStyle {
    fn new(color: &str, alpha: f64) -> Self {
        Self { color: color.to_string(), alpha }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Visible years starting at the first baseline year.
    pub x_span_years: i32,
    pub y_max_musd: f64,
    pub jwst: LayerStyle,
    pub wfirst: LayerStyle,
    /// M1, M2, M3. Markers and ops bars reuse these colors.
    pub missions: [LayerStyle; 3],
    pub probes: LayerStyle,
    pub apd: LayerStyle,
    /// Vertical position of each mission's launch marker and ops bar.
    pub marker_heights: [f64; 3],
    /// Caption position; the value is drawn at `value_x`.
    pub label_x: f64,
    pub label_y: f64,
    pub value_x: f64,
    pub label_text: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            x_span_years: 41,
            y_max_musd: 2800.0,
            jwst: LayerStyle::new("#CB297B", 1.0),
            wfirst: LayerStyle::new("#B51700", 0.5),
            missions: [
                LayerStyle::new("#0098FF", 1.0),
                LayerStyle::new("#61D836", 1.0),
                LayerStyle::new("#F8BA00", 1.0),
            ],
            probes: LayerStyle::new("#8E44AD", 0.7),
            apd: LayerStyle::new("#DEDEDE", 0.5),
            marker_heights: [2000.0, 2100.0, 2200.0],
            label_x: 2040.0,
            label_y: 2500.0,
            value_x: 2056.0,
            label_text: "Years of Simultaneous Operation:".to_string(),
        }
    }
}

impl ChartStyle {
    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
