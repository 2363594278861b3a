// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Chart Frame

//! Everything the rendering layer needs to redraw the stacked-area chart,
//! flattened into plain series so the front end does no arithmetic.

use crate::config::{ChartStyle, LayerStyle};
use crate::simulator::Snapshot;
use crate::types::{MissionId, ScheduleRow};
use serde::Serialize;

// ─── Frame pieces ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StackLayer {
    pub name: &'static str,
    pub color: String,
    pub alpha: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchMarker {
    pub mission: MissionId,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpsSegment {
    pub mission: MissionId,
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlapLabel {
    pub label_x: f64,
    pub label_y: f64,
    pub label_text: String,
    pub value_x: f64,
    pub value_text: String,
}

// ─── ChartFrame ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChartFrame {
    pub revision: u64,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub years: Vec<i32>,
    /// Bottom to top.
    pub layers: Vec<StackLayer>,
    pub totals: Vec<f64>,
    pub markers: Vec<LaunchMarker>,
    pub ops_segments: Vec<OpsSegment>,
    pub label: OverlapLabel,
}

impl ChartFrame {
    pub fn build(snapshot: &Snapshot, style: &ChartStyle, with_probes: bool) -> Self {
        let rows = &snapshot.allocation.schedule.rows;
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        let first = years.first().copied().unwrap_or(0);
        let last = years.last().copied().unwrap_or(first);
        let x_end = (first + style.x_span_years).min(last);

        let layer = |name: &'static str, s: &LayerStyle, f: &dyn Fn(&ScheduleRow) -> f64| StackLayer {
            name,
            color: s.color.clone(),
            alpha: s.alpha,
            values: rows.iter().map(f).collect(),
        };

        let mut layers = vec![
            layer("JWST", &style.jwst, &|r| r.jwst),
            layer("WFIRST", &style.wfirst, &|r| r.wfirst),
        ];
        for id in MissionId::ALL {
            layers.push(layer(id.label(), &style.missions[id.index()], &move |r| r.mission(id)));
        }
        if with_probes {
            layers.push(layer("Probes", &style.probes, &|r| r.probes));
        }
        layers.push(layer("APD", &style.apd, &|r| r.apd));

        let metrics = &snapshot.metrics;
        let markers = MissionId::ALL
            .iter()
            .map(|&id| LaunchMarker {
                mission: id,
                x: metrics.launch_years[id.index()] as f64,
                y: style.marker_heights[id.index()],
                color: style.missions[id.index()].color.clone(),
            })
            .collect();
        let ops_segments = metrics
            .ops_windows
            .iter()
            .map(|w| {
                let y = style.marker_heights[w.mission.index()];
                OpsSegment {
                    mission: w.mission,
                    x: [w.start, w.end],
                    y: [y, y],
                    color: style.missions[w.mission.index()].color.clone(),
                }
            })
            .collect();

        Self {
            revision: snapshot.revision,
            x_range: [first as f64, x_end as f64],
            y_range: [0.0, style.y_max_musd],
            years,
            layers,
            totals: rows.iter().map(ScheduleRow::total).collect(),
            markers,
            ops_segments,
            label: OverlapLabel {
                label_x: style.label_x,
                label_y: style.label_y,
                label_text: style.label_text.clone(),
                value_x: style.value_x,
                value_text: metrics.simultaneous_ops_years.to_string(),
            },
        }
    }

    pub fn layer(&self, name: &str) -> Option<&StackLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}
