// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Type Definitions

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Mission ────────────────────────────────────────────────────────────────

/// The three flagship missions, launched in order M1 → M2 → M3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MissionId {
    M1 = 0,
    M2 = 1,
    M3 = 2,
}

impl MissionId {
    pub const ALL: [MissionId; 3] = [MissionId::M1, MissionId::M2, MissionId::M3];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The mission whose boundary this one hands off from.
    pub fn predecessor(self) -> Option<MissionId> {
        match self {
            Self::M1 => None,
            Self::M2 => Some(Self::M1),
            Self::M3 => Some(Self::M2),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::M1 => "M1",
            Self::M2 => "M2",
            Self::M3 => "M3",
        }
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Schedule ───────────────────────────────────────────────────────────────

/// One year of spend, all amounts in $M constant-year dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub year: i32,
    pub apd: f64,
    pub probes: f64,
    pub jwst: f64,
    pub wfirst: f64,
    /// M1, M2, M3 in mission order.
    pub missions: [f64; 3],
}

impl ScheduleRow {
    pub fn mission(&self, id: MissionId) -> f64 {
        self.missions[id.index()]
    }

    /// Legacy flagship spend still running in this year.
    pub fn legacy_flagships(&self) -> f64 {
        self.jwst + self.wfirst
    }

    /// Sum of every column in the row.
    pub fn total(&self) -> f64 {
        self.apd + self.probes + self.jwst + self.wfirst + self.missions.iter().sum::<f64>()
    }
}

/// Year-indexed spend table. Rows are contiguous and ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn year(&self, row: usize) -> Option<i32> {
        self.rows.get(row).map(|r| r.year)
    }

    pub fn first_year(&self) -> Option<i32> {
        self.rows.first().map(|r| r.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.rows.last().map(|r| r.year)
    }

    /// Copy of one mission column.
    pub fn column(&self, id: MissionId) -> Vec<f64> {
        self.rows.iter().map(|r| r.mission(id)).collect()
    }

    /// Replace one mission column. Rows past the end of `values` are zeroed.
    pub fn set_column(&mut self, id: MissionId, values: &[f64]) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.missions[id.index()] = values.get(i).copied().unwrap_or(0.0);
        }
    }
}

// ─── Parameters ─────────────────────────────────────────────────────────────

/// The five user controls. Costs and rates are in $B, lifetime in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Flagship wedge, $B per year.
    pub envelope_rate: Decimal,
    /// Total cost per mission, $B.
    pub mission_costs: [Decimal; 3],
    /// Operational lifetime shared by all missions, years.
    pub lifetime_years: Decimal,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            envelope_rate: dec!(0.6),
            mission_costs: [dec!(10.0), dec!(6.0), dec!(5.0)],
            lifetime_years: dec!(10),
        }
    }
}

impl Parameters {
    pub fn cost(&self, id: MissionId) -> Decimal {
        self.mission_costs[id.index()]
    }
}

// ─── Derived outputs ────────────────────────────────────────────────────────

/// Half-open operating interval `[start, end)` of one mission, in years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpsWindow {
    pub mission: MissionId,
    pub start: f64,
    pub end: f64,
}

impl OpsWindow {
    pub fn contains(&self, year: f64) -> bool {
        year >= self.start && year < self.end
    }
}

/// Boundary rows for M1, M2, M3.
pub type Boundaries = [usize; 3];

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32) -> ScheduleRow {
        ScheduleRow {
            year,
            apd: 700.0,
            probes: 150.0,
            jwst: 10.0,
            wfirst: 20.0,
            missions: [1.0, 2.0, 3.0],
        }
    }

    #[test]
    fn test_mission_order_and_predecessors() {
        assert_eq!(MissionId::ALL.map(MissionId::index), [0, 1, 2]);
        assert_eq!(MissionId::M1.predecessor(), None);
        assert_eq!(MissionId::M2.predecessor(), Some(MissionId::M1));
        assert_eq!(MissionId::M3.predecessor(), Some(MissionId::M2));
        assert_eq!(MissionId::M3.to_string(), "M3");
    }

    #[test]
    fn test_row_total_sums_every_column() {
        assert_eq!(row(2020).total(), 700.0 + 150.0 + 10.0 + 20.0 + 6.0);
        assert_eq!(row(2020).legacy_flagships(), 30.0);
    }

    #[test]
    fn test_set_column_zeroes_missing_tail() {
        let mut s = Schedule { rows: vec![row(2020), row(2021), row(2022)] };
        s.set_column(MissionId::M2, &[9.0]);
        assert_eq!(s.column(MissionId::M2), vec![9.0, 0.0, 0.0]);
        assert_eq!(s.column(MissionId::M1), vec![1.0, 1.0, 1.0]);
        assert_eq!(s.year(2), Some(2022));
        assert_eq!(s.year(3), None);
    }

    #[test]
    fn test_ops_window_is_half_open() {
        let w = OpsWindow { mission: MissionId::M1, start: 2044.0, end: 2054.0 };
        assert!(w.contains(2044.0));
        assert!(w.contains(2053.0));
        assert!(!w.contains(2054.0));
    }
}
