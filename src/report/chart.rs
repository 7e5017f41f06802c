//! Proportional chart render contract and the per-canvas chart lifecycle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::config::ChartConfig;
use crate::core::errors::Result;
use crate::host::{ChartBackend, ChartHandle};
use crate::report::series::ChartViewModel;

/// Circular chart kind, applied to both series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Doughnut,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

/// Everything a chart backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub border_width: u32,
    /// Inner radius percent; `None` for pies.
    pub cutout_pct: Option<f64>,
    /// `None` hides the legend.
    pub legend: Option<LegendPosition>,
    pub tooltip: bool,
    pub interactive: bool,
}

impl ChartSpec {
    /// Spec for `vm`. Without data, or when `vm` is itself the placeholder,
    /// the placeholder segment is drawn with legend, tooltip and interaction
    /// turned off.
    #[must_use]
    pub fn build(vm: &ChartViewModel, style: &ChartConfig, has_data: bool) -> Self {
        let cutout_pct = match style.kind {
            ChartKind::Doughnut => Some(style.cutout_pct),
            ChartKind::Pie => None,
        };
        if !has_data || vm.is_placeholder() {
            let placeholder = ChartViewModel::placeholder();
            return Self {
                kind: style.kind,
                labels: placeholder.labels,
                values: placeholder.values,
                colors: placeholder.colors,
                border_width: style.border_width,
                cutout_pct,
                legend: None,
                tooltip: false,
                interactive: false,
            };
        }
        Self {
            kind: style.kind,
            labels: vm.labels.clone(),
            values: vm.values.clone(),
            colors: vm.colors.clone(),
            border_width: style.border_width,
            cutout_pct,
            legend: Some(style.legend),
            tooltip: true,
            interactive: true,
        }
    }

    /// Tooltip for segment `index`: `"{label}: {value}건"`.
    #[must_use]
    pub fn tooltip_text(&self, index: usize) -> Option<String> {
        if !self.tooltip {
            return None;
        }
        let label = self.labels.get(index)?;
        let value = self.values.get(index)?;
        Some(format!("{label}: {}건", format_count(*value)))
    }
}

/// Counts print without a fractional part when integral.
#[must_use]
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Owns at most one live chart per canvas. A render releases the previous
/// drawable for that canvas before acquiring a new one.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    style: ChartConfig,
    live: HashMap<String, ChartHandle>,
}

impl ChartRenderer {
    #[must_use]
    pub fn new(style: ChartConfig) -> Self {
        Self {
            style,
            live: HashMap::new(),
        }
    }

    /// Draw `vm` on `canvas`, replacing whatever was bound there.
    pub fn render<B>(
        &mut self,
        backend: &mut B,
        canvas: &str,
        vm: &ChartViewModel,
        has_data: bool,
    ) -> Result<ChartSpec>
    where
        B: ChartBackend + ?Sized,
    {
        self.release(backend, canvas);
        let spec = ChartSpec::build(vm, &self.style, has_data);
        let handle = backend.create_chart(canvas, &spec)?;
        self.live.insert(canvas.to_string(), handle);
        Ok(spec)
    }

    /// Destroy the chart bound to `canvas`, if any.
    pub fn release<B>(&mut self, backend: &mut B, canvas: &str)
    where
        B: ChartBackend + ?Sized,
    {
        if let Some(handle) = self.live.remove(canvas) {
            backend.destroy_chart(handle);
        }
    }

    /// Destroy every live chart.
    pub fn release_all<B>(&mut self, backend: &mut B)
    where
        B: ChartBackend + ?Sized,
    {
        for (_, handle) in self.live.drain() {
            backend.destroy_chart(handle);
        }
    }

    #[must_use]
    pub fn handle(&self, canvas: &str) -> Option<ChartHandle> {
        self.live.get(canvas).copied()
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub const fn style(&self) -> &ChartConfig {
        &self.style
    }
}
