// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Baseline Table

//! Background-program spend loaded once at startup.
//!
//! The table is whitespace separated with one header line. Columns are
//! found by name; `Year`, `APD`, `JWST` and `WFIRST` are required,
//! `Probes` is optional and any `M1`..`M3` columns are ignored because the
//! engine rebuilds them on every recomputation.

use crate::error::LoadError;
use crate::types::{Schedule, ScheduleRow};
use serde::{Deserialize, Serialize};

/// The shipped slow-ramp scenario, 2020 through 2069.
pub const SLOW_RAMP: &str = include_str!("../data/slow_ramp.txt");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineRow {
    pub year: i32,
    pub apd: f64,
    pub probes: f64,
    pub jwst: f64,
    pub wfirst: f64,
}

/// Immutable background spend, one row per contiguous year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTable {
    rows: Vec<BaselineRow>,
    has_probes: bool,
}

struct Columns {
    width: usize,
    year: usize,
    apd: usize,
    jwst: usize,
    wfirst: usize,
    probes: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, LoadError> {
        let names: Vec<&str> = header.split_whitespace().collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(name))
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Self {
            width: names.len(),
            year: find("Year")?,
            apd: find("APD")?,
            jwst: find("JWST")?,
            wfirst: find("WFIRST")?,
            probes: find("Probes").ok(),
        })
    }
}

impl BaselineTable {
    /// Parse the embedded slow-ramp table.
    pub fn slow_ramp() -> Result<Self, LoadError> {
        Self::parse(SLOW_RAMP)
    }

    /// Parse a table from text. `min_rows` is the shortest table the
    /// allocation policy can address.
    pub fn parse_with_min_rows(text: &str, min_rows: usize) -> Result<Self, LoadError> {
        let table = Self::parse(text)?;
        if table.len() < min_rows {
            return Err(LoadError::TooShort { rows: table.len(), required: min_rows });
        }
        Ok(table)
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (_, header) = lines.next().ok_or(LoadError::Empty)?;
        let cols = Columns::from_header(header)?;

        let mut rows: Vec<BaselineRow> = Vec::new();
        for (line, text) in lines {
            let fields: Vec<&str> = text.split_whitespace().collect();
            if fields.len() != cols.width {
                return Err(LoadError::RaggedRow { line, expected: cols.width, found: fields.len() });
            }
            let num = |idx: usize, column: &str| -> Result<f64, LoadError> {
                fields[idx]
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| LoadError::BadNumber {
                        line,
                        column: column.to_string(),
                        value: fields[idx].to_string(),
                    })
            };
            let year = fields[cols.year].parse::<i32>().map_err(|_| LoadError::BadNumber {
                line,
                column: "Year".to_string(),
                value: fields[cols.year].to_string(),
            })?;
            if let Some(prev) = rows.last() {
                if year != prev.year + 1 {
                    return Err(LoadError::NonContiguousYears { line, previous: prev.year, found: year });
                }
            }
            rows.push(BaselineRow {
                year,
                apd: num(cols.apd, "APD")?,
                probes: match cols.probes {
                    Some(idx) => num(idx, "Probes")?,
                    None => 0.0,
                },
                jwst: num(cols.jwst, "JWST")?,
                wfirst: num(cols.wfirst, "WFIRST")?,
            });
        }

        if rows.is_empty() {
            return Err(LoadError::Empty);
        }
        log::debug!(
            "baseline: loaded {} rows {}..={} (probes column: {})",
            rows.len(),
            rows[0].year,
            rows[rows.len() - 1].year,
            cols.probes.is_some()
        );
        Ok(Self { rows, has_probes: cols.probes.is_some() })
    }

    pub fn rows(&self) -> &[BaselineRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_probes(&self) -> bool {
        self.has_probes
    }

    pub fn first_year(&self) -> i32 {
        self.rows.first().map_or(0, |r| r.year)
    }

    /// Fresh schedule over the first `horizon` rows with every mission
    /// column at zero.
    pub fn to_schedule(&self, horizon: usize) -> Schedule {
        Schedule {
            rows: self
                .rows
                .iter()
                .take(horizon)
                .map(|b| ScheduleRow {
                    year: b.year,
                    apd: b.apd,
                    probes: b.probes,
                    jwst: b.jwst,
                    wfirst: b.wfirst,
                    missions: [0.0; 3],
                })
                .collect(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
