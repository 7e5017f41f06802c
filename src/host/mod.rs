//! Host page surfaces the dashboard renders into.
//!
//! The dashboard never touches a concrete page. It talks to three traits:
//! [`Page`] for elements, [`ChartBackend`] for chart drawables bound to a
//! canvas, and [`CloudEngine`] for the keyword-cloud layout capability,
//! which may not be loaded yet when the dashboard starts.

pub mod headless;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::report::chart::ChartSpec;
use crate::report::cloud::CloudWord;

pub use headless::HeadlessPage;

/// Opaque id of a live chart drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartHandle(pub u64);

/// Element access on the host page. Every method that targets an element
/// fails with `MissingElement` when the id is absent.
pub trait Page {
    fn contains(&self, id: &str) -> bool;
    fn set_visible(&mut self, id: &str, visible: bool) -> Result<()>;
    fn set_text(&mut self, id: &str, text: &str) -> Result<()>;
    /// Add (`on`) or remove a CSS-style class.
    fn toggle_class(&mut self, id: &str, class: &str, on: bool) -> Result<()>;
    /// Hand page control to `path`.
    fn navigate(&mut self, path: &str);
}

/// Chart drawables bound to canvas elements.
pub trait ChartBackend {
    fn create_chart(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartHandle>;
    fn destroy_chart(&mut self, handle: ChartHandle);
}

/// Keyword-cloud layout capability.
pub trait CloudEngine {
    /// Whether the layout capability is loaded. Hosts may flip this over time.
    fn is_ready(&mut self) -> bool;
    fn area_width(&self, area: &str) -> Result<f64>;
    /// Replace the area's content with `words`.
    fn draw(&mut self, area: &str, words: &[CloudWord]) -> Result<()>;
    fn clear(&mut self, area: &str) -> Result<()>;
}

/// Element ids the dashboard binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub dream_tab: String,
    pub emotion_tab: String,
    pub dream_panel: String,
    pub emotion_panel: String,
    pub dream_canvas: String,
    pub emotion_canvas: String,
    pub summary: String,
    pub cloud_area: String,
    pub dropdown: String,
    pub period_label: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            dream_tab: "typeTab".to_string(),
            emotion_tab: "emotionTab".to_string(),
            dream_panel: "typeChartContainer".to_string(),
            emotion_panel: "emotionChartContainer".to_string(),
            dream_canvas: "typeChart".to_string(),
            emotion_canvas: "emotionChart".to_string(),
            summary: "summaryText".to_string(),
            cloud_area: "wordCloud".to_string(),
            dropdown: "monthDropdown".to_string(),
            period_label: "currentPeriod".to_string(),
        }
    }
}

impl PageLayout {
    /// Every id, for hosts that build the page from the layout.
    #[must_use]
    pub fn element_ids(&self) -> [&str; 10] {
        [
            &self.dream_tab,
            &self.emotion_tab,
            &self.dream_panel,
            &self.emotion_panel,
            &self.dream_canvas,
            &self.emotion_canvas,
            &self.summary,
            &self.cloud_area,
            &self.dropdown,
            &self.period_label,
        ]
    }
}
