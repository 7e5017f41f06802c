//! In-memory page used by the terminal dashboard, the `render` command and tests.

use std::collections::{BTreeSet, HashMap};

use crate::core::errors::{ReportError, Result};
use crate::host::{ChartBackend, ChartHandle, CloudEngine, Page, PageLayout};
use crate::report::chart::ChartSpec;
use crate::report::cloud::CloudWord;

const DEFAULT_AREA_WIDTH: f64 = 600.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Element {
    visible: bool,
    text: String,
    classes: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct LiveChart {
    canvas: String,
    spec: ChartSpec,
}

/// Element tree, chart registry and cloud engine, all in memory.
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    elements: HashMap<String, Element>,
    charts: HashMap<ChartHandle, LiveChart>,
    next_handle: u64,
    charts_created: u64,
    cloud_words: HashMap<String, Vec<CloudWord>>,
    /// Readiness checks that still report "not ready".
    cloud_pending_checks: u32,
    area_width: f64,
    navigations: Vec<String>,
}

impl HeadlessPage {
    /// Page containing every element of `layout`, all visible.
    #[must_use]
    pub fn new(layout: &PageLayout) -> Self {
        let elements = layout
            .element_ids()
            .into_iter()
            .map(|id| {
                (
                    id.to_string(),
                    Element {
                        visible: true,
                        ..Element::default()
                    },
                )
            })
            .collect();
        Self {
            elements,
            charts: HashMap::new(),
            next_handle: 0,
            charts_created: 0,
            cloud_words: HashMap::new(),
            cloud_pending_checks: 0,
            area_width: DEFAULT_AREA_WIDTH,
            navigations: Vec::new(),
        }
    }

    pub fn remove_element(&mut self, id: &str) {
        self.elements.remove(id);
    }

    /// The cloud engine reports "not ready" for the next `checks` checks.
    pub fn set_cloud_ready_after(&mut self, checks: u32) {
        self.cloud_pending_checks = checks;
    }

    pub fn set_area_width(&mut self, width: f64) {
        self.area_width = width;
    }

    #[must_use]
    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.classes.contains(class))
    }

    /// Number of live charts bound to `canvas`.
    #[must_use]
    pub fn live_charts(&self, canvas: &str) -> usize {
        self.charts.values().filter(|c| c.canvas == canvas).count()
    }

    #[must_use]
    pub fn total_live_charts(&self) -> usize {
        self.charts.len()
    }

    /// Charts created over the page's lifetime, destroyed ones included.
    #[must_use]
    pub const fn charts_created(&self) -> u64 {
        self.charts_created
    }

    /// Spec of the live chart on `canvas`, if exactly one is bound.
    #[must_use]
    pub fn chart_spec(&self, canvas: &str) -> Option<&ChartSpec> {
        let mut bound = self.charts.values().filter(|c| c.canvas == canvas);
        match (bound.next(), bound.next()) {
            (Some(chart), None) => Some(&chart.spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn cloud_words(&self, area: &str) -> &[CloudWord] {
        self.cloud_words.get(area).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    #[must_use]
    pub fn last_navigation(&self) -> Option<&str> {
        self.navigations.last().map(String::as_str)
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| ReportError::missing_element(id))
    }
}

impl Page for HeadlessPage {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        self.element_mut(id)?.visible = visible;
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        text.clone_into(&mut self.element_mut(id)?.text);
        Ok(())
    }

    fn toggle_class(&mut self, id: &str, class: &str, on: bool) -> Result<()> {
        let element = self.element_mut(id)?;
        if on {
            element.classes.insert(class.to_string());
        } else {
            element.classes.remove(class);
        }
        Ok(())
    }

    fn navigate(&mut self, path: &str) {
        self.navigations.push(path.to_string());
    }
}

impl ChartBackend for HeadlessPage {
    fn create_chart(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartHandle> {
        if !self.contains(canvas) {
            return Err(ReportError::missing_element(canvas));
        }
        self.next_handle += 1;
        self.charts_created += 1;
        let handle = ChartHandle(self.next_handle);
        self.charts.insert(
            handle,
            LiveChart {
                canvas: canvas.to_string(),
                spec: spec.clone(),
            },
        );
        Ok(handle)
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.charts.remove(&handle);
    }
}

impl CloudEngine for HeadlessPage {
    fn is_ready(&mut self) -> bool {
        if self.cloud_pending_checks == 0 {
            return true;
        }
        self.cloud_pending_checks -= 1;
        false
    }

    fn area_width(&self, area: &str) -> Result<f64> {
        if self.contains(area) {
            Ok(self.area_width)
        } else {
            Err(ReportError::missing_element(area))
        }
    }

    fn draw(&mut self, area: &str, words: &[CloudWord]) -> Result<()> {
        if !self.contains(area) {
            return Err(ReportError::missing_element(area));
        }
        self.cloud_words.insert(area.to_string(), words.to_vec());
        Ok(())
    }

    fn clear(&mut self, area: &str) -> Result<()> {
        if !self.contains(area) {
            return Err(ReportError::missing_element(area));
        }
        self.cloud_words.remove(area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ChartConfig;
    use crate::report::series::ChartViewModel;

    #[test]
    fn layout_elements_exist_and_are_visible() {
        let layout = PageLayout::default();
        let page = HeadlessPage::new(&layout);
        for id in layout.element_ids() {
            assert!(page.contains(id), "{id} missing");
            assert!(page.is_visible(id));
        }
    }

    #[test]
    fn operations_on_removed_element_fail() {
        let mut page = HeadlessPage::new(&PageLayout::default());
        page.remove_element("summaryText");
        let err = page.set_text("summaryText", "x").expect_err("missing");
        assert!(matches!(err, ReportError::MissingElement { .. }));
    }

    #[test]
    fn chart_registry_tracks_canvas() {
        let mut page = HeadlessPage::new(&PageLayout::default());
        let spec = ChartSpec::build(&ChartViewModel::placeholder(), &ChartConfig::default(), false);
        let first = page.create_chart("typeChart", &spec).expect("create");
        page.create_chart("typeChart", &spec).expect("create again");
        assert_eq!(page.live_charts("typeChart"), 2);
        assert_eq!(page.chart_spec("typeChart"), None);
        page.destroy_chart(first);
        assert_eq!(page.live_charts("typeChart"), 1);
        assert!(page.chart_spec("typeChart").is_some());
        assert_eq!(page.charts_created(), 2);
    }

    #[test]
    fn cloud_readiness_counts_down() {
        let mut page = HeadlessPage::new(&PageLayout::default());
        page.set_cloud_ready_after(2);
        assert!(!page.is_ready());
        assert!(!page.is_ready());
        assert!(page.is_ready());
    }

    #[test]
    fn classes_toggle() {
        let mut page = HeadlessPage::new(&PageLayout::default());
        page.toggle_class("typeTab", "active", true).expect("on");
        assert!(page.has_class("typeTab", "active"));
        page.toggle_class("typeTab", "active", false).expect("off");
        assert!(!page.has_class("typeTab", "active"));
    }
}
