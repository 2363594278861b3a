// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Error Types

use crate::types::MissionId;

// ---------------------------------------------------------------------------
// Baseline loading
// ---------------------------------------------------------------------------

/// Errors raised while parsing the baseline spend table. All of them are
/// fatal at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("baseline table is empty")]
    Empty,

    #[error("baseline header is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: column `{column}` has unparseable value `{value}`")]
    BadNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: year {found} does not follow {previous}")]
    NonContiguousYears {
        line: usize,
        previous: i32,
        found: i32,
    },

    #[error("baseline has {rows} rows but the pre-ramp window needs at least {required}")]
    TooShort { rows: usize, required: usize },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

/// Errors raised by one recomputation. None of them touch the previously
/// published state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("envelope rate {rate} $B/yr must exceed the {overhead} $B/yr overhead")]
    InvalidEnvelopeRate { rate: f64, overhead: f64 },

    #[error("{mission} cost {cost} $B is not a finite amount")]
    InvalidMissionCost { mission: MissionId, cost: f64 },

    #[error("{name} = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("schedule horizon exceeded: {mission} boundary row {boundary} is outside 0..{horizon}")]
    HorizonExceeded {
        mission: MissionId,
        boundary: i64,
        horizon: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Config(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_message_names_mission() {
        let err = EngineError::HorizonExceeded {
            mission: MissionId::M2,
            boundary: 89,
            horizon: 50,
        };
        let msg = err.to_string();
        assert!(msg.contains("M2"), "{msg}");
        assert!(msg.contains("89"), "{msg}");
    }

    #[test]
    fn test_load_error_converts() {
        let err: EngineError = LoadError::MissingColumn("JWST").into();
        assert_eq!(err, EngineError::Load(LoadError::MissingColumn("JWST")));
        assert!(err.to_string().contains("JWST"));
    }
}
