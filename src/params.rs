// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Control Ranges

//! Slider domains for the five user controls.
//!
//! Values are held as `Decimal` so that a wedge of 0.6 stays 0.6 no matter
//! how many times the widget layer nudges it. Incoming floats are snapped
//! to the step grid and then checked against the range.

use crate::error::{EngineError, EngineResult};
use crate::types::{MissionId, Parameters};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

// ---------------------------------------------------------------------------
// SliderRange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderRange {
    pub name: &'static str,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    pub default: Decimal,
}

impl SliderRange {
    /// Round `value` to the nearest grid point `min + k * step`.
    pub fn snap(&self, value: f64) -> EngineResult<Decimal> {
        let raw = Decimal::from_f64(value).ok_or_else(|| self.out_of_range(value.to_string()))?;
        if self.step <= Decimal::ZERO {
            return Ok(raw);
        }
        let steps = ((raw - self.min) / self.step).round();
        Ok((self.min + steps * self.step).normalize())
    }

    pub fn validate(&self, value: Decimal) -> EngineResult<Decimal> {
        if value < self.min || value > self.max {
            return Err(self.out_of_range(value.to_string()));
        }
        Ok(value)
    }

    /// Snap then validate.
    pub fn accept(&self, value: f64) -> EngineResult<Decimal> {
        if !value.is_finite() {
            return Err(self.out_of_range(value.to_string()));
        }
        self.validate(self.snap(value)?)
    }

    /// Number of grid points in the range, inclusive of both ends.
    pub fn grid_len(&self) -> usize {
        if self.step <= Decimal::ZERO {
            return 1;
        }
        ((self.max - self.min) / self.step).floor().to_usize().unwrap_or(0) + 1
    }

    /// The `k`-th grid point, or `None` past the end.
    pub fn grid_point(&self, k: usize) -> Option<Decimal> {
        if k >= self.grid_len() {
            return None;
        }
        Some(self.min + Decimal::from(k) * self.step)
    }

    fn out_of_range(&self, value: String) -> EngineError {
        EngineError::ParameterOutOfRange {
            name: self.name,
            value,
            min: self.min.to_string(),
            max: self.max.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ParameterRanges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ParameterRanges {
    pub envelope_rate: SliderRange,
    pub lifetime_years: SliderRange,
    pub mission_costs: [SliderRange; 3],
}

impl Default for ParameterRanges {
    fn default() -> Self {
        let cost = |name, default| SliderRange {
            name,
            min: dec!(3.0),
            max: dec!(20.0),
            step: dec!(0.5),
            default,
        };
        Self {
            envelope_rate: SliderRange {
                name: "envelope_rate",
                min: dec!(0.5),
                max: dec!(2.0),
                step: dec!(0.1),
                default: dec!(0.6),
            },
            lifetime_years: SliderRange {
                name: "lifetime_years",
                min: dec!(5),
                max: dec!(30),
                step: dec!(1),
                default: dec!(10),
            },
            mission_costs: [
                cost("mission1_cost", dec!(10.0)),
                cost("mission2_cost", dec!(6.0)),
                cost("mission3_cost", dec!(5.0)),
            ],
        }
    }
}

impl ParameterRanges {
    pub fn cost(&self, id: MissionId) -> &SliderRange {
        &self.mission_costs[id.index()]
    }

    /// Parameters with every control at its default position.
    pub fn defaults(&self) -> Parameters {
        Parameters {
            envelope_rate: self.envelope_rate.default,
            mission_costs: self.mission_costs.map(|r| r.default),
            lifetime_years: self.lifetime_years.default,
        }
    }

    /// Check a full parameter set against every range.
    pub fn validate(&self, params: &Parameters) -> EngineResult<()> {
        self.envelope_rate.validate(params.envelope_rate)?;
        self.lifetime_years.validate(params.lifetime_years)?;
        for id in MissionId::ALL {
            self.cost(id).validate(params.cost(id))?;
        }
        Ok(())
    }
}

/// Lossy `Decimal` → `f64` for the allocation arithmetic.
pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

// ===========================================================================
// Tests
// ===========================================================================
