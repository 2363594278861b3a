// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Derived Metrics

use crate::allocation::Allocation;
use crate::error::{EngineError, EngineResult};
use crate::types::{Boundaries, MissionId, OpsWindow, Schedule};
use serde::{Deserialize, Serialize};

/// Launch years, operating windows and the triple-overlap count for one
/// allocation and lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub launch_years: [i32; 3],
    pub ops_windows: [OpsWindow; 3],
    /// Years during which all three missions operate at once.
    pub simultaneous_ops_years: u32,
}

/// Years from M3's launch to the end of M1's operating life, floored at
/// zero. Missions launch in order, so M1 retires first and M3 arrives last;
/// that gap bounds the window where all three overlap.
pub fn simultaneous_ops_years(launch_years: &[i32; 3], lifetime_years: f64) -> u32 {
    let overlap = (launch_years[0] as f64 + lifetime_years - launch_years[2] as f64).round();
    if overlap.is_finite() && overlap > 0.0 {
        overlap as u32
    } else {
        0
    }
}

/// Recompute every derived figure. A boundary that does not index a row
/// of `schedule` is a `HorizonExceeded` error.
pub fn recompute(schedule: &Schedule, boundaries: &Boundaries, lifetime_years: f64) -> EngineResult<DerivedMetrics> {
    let mut launch_years = [0; 3];
    for id in MissionId::ALL {
        let boundary = boundaries[id.index()];
        launch_years[id.index()] = schedule.year(boundary).ok_or(EngineError::HorizonExceeded {
            mission: id,
            boundary: boundary as i64,
            horizon: schedule.len(),
        })?;
    }
    let ops_windows = MissionId::ALL.map(|id| {
        let start = launch_years[id.index()] as f64;
        OpsWindow { mission: id, start, end: start + lifetime_years }
    });

    Ok(DerivedMetrics {
        launch_years,
        ops_windows,
        simultaneous_ops_years: simultaneous_ops_years(&launch_years, lifetime_years),
    })
}

/// Convenience over [`recompute`] for a finished allocation.
pub fn for_allocation(allocation: &Allocation, lifetime_years: f64) -> EngineResult<DerivedMetrics> {
    recompute(&allocation.schedule, &allocation.boundaries(), lifetime_years)
}
