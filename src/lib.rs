// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine

pub mod types;
pub mod error;
pub mod config;
pub mod params;
pub mod baseline;
pub mod allocation;
pub mod metrics;
pub mod chart;
pub mod simulator;

pub use types::*;
pub use error::{EngineError, EngineResult, LoadError};
pub use config::{AllocationConfig, ChartStyle, LayerStyle, MissionPolicy};
pub use params::{ParameterRanges, SliderRange};
pub use baseline::{BaselineRow, BaselineTable};
pub use allocation::{allocate, Allocation, MissionAllocation};
pub use metrics::DerivedMetrics;
pub use chart::ChartFrame;
pub use simulator::{run_pipeline, FlagshipSimulator, Snapshot};

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log(s: &str);
}

// ─── Browser logging ─────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            console_log(&format!("[{} {}] {}", record.level(), record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

/// Panic hook and console logger. Safe to call more than once.
fn install_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        if log::set_logger(&CONSOLE_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn to_js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl FlagshipSimulator {
    /// Shipped slow-ramp baseline, default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FlagshipSimulator, JsValue> {
        install_hooks();
        FlagshipSimulator::with_defaults().map_err(to_js_error)
    }

    /// Custom baseline table, with optional JSON overrides for the
    /// allocation constants and chart styling.
    pub fn with_table(
        table: &str,
        config_json: Option<String>,
        style_json: Option<String>,
    ) -> Result<FlagshipSimulator, JsValue> {
        install_hooks();
        let build = || -> EngineResult<FlagshipSimulator> {
            let baseline = BaselineTable::parse(table)?;
            let config = match config_json.as_deref() {
                Some(text) => AllocationConfig::from_json_str(text)?,
                None => AllocationConfig::default(),
            };
            let style = match style_json.as_deref() {
                Some(text) => ChartStyle::from_json_str(text)?,
                None => ChartStyle::default(),
            };
            FlagshipSimulator::from_parts(baseline, config, style)
        };
        build().map_err(to_js_error)
    }

    // Each setter returns the redrawn frame, or an error string with the
    // previous frame still current.

    pub fn set_envelope_rate(&mut self, value: f64) -> Result<JsValue, JsValue> {
        self.set_envelope_rate_core(value).map_err(to_js_error)?;
        Ok(to_js(&self.frame()))
    }

    pub fn set_mission1_cost(&mut self, value: f64) -> Result<JsValue, JsValue> {
        self.set_mission_cost(MissionId::M1, value)
    }

    pub fn set_mission2_cost(&mut self, value: f64) -> Result<JsValue, JsValue> {
        self.set_mission_cost(MissionId::M2, value)
    }

    pub fn set_mission3_cost(&mut self, value: f64) -> Result<JsValue, JsValue> {
        self.set_mission_cost(MissionId::M3, value)
    }

    pub fn set_lifetime(&mut self, value: f64) -> Result<JsValue, JsValue> {
        self.set_lifetime_core(value).map_err(to_js_error)?;
        Ok(to_js(&self.frame()))
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.reset_core().map_err(to_js_error)?;
        Ok(to_js(&self.frame()))
    }

    pub fn get_frame(&self) -> JsValue {
        to_js(&self.frame())
    }

    pub fn get_snapshot(&self) -> JsValue {
        to_js(self.snapshot())
    }

    pub fn get_parameters(&self) -> JsValue {
        to_js(self.parameters())
    }

    pub fn get_ranges(&self) -> JsValue {
        to_js(self.ranges())
    }

    pub fn revision(&self) -> u64 {
        self.snapshot().revision
    }
}

impl FlagshipSimulator {
    fn set_mission_cost(&mut self, mission: MissionId, value: f64) -> Result<JsValue, JsValue> {
        self.set_mission_cost_core(mission, value).map_err(to_js_error)?;
        Ok(to_js(&self.frame()))
    }
}
