//! Weighted keyword cloud: sizing, coloring and the readiness-retry contract.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::core::config::CloudConfig;
use crate::core::errors::{ReportError, Result};
use crate::host::{CloudEngine, Page};
use crate::report::series::{KeywordWeight, NEUTRAL_COLOR};

/// Class marking the cloud area as empty.
pub const NO_DATA_CLASS: &str = "no-data";

/// Placeholder shown when there is nothing to draw.
pub const NO_KEYWORDS_TEXT: &str = "no keywords for this period";

/// Placeholder shown once the engine never became ready.
pub const UNAVAILABLE_TEXT: &str = "word cloud unavailable";

/// One laid-out keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudWord {
    pub text: String,
    pub weight: f64,
    /// Weight after the display floor.
    pub effective_weight: f64,
    pub size: f64,
    pub color: String,
}

/// What a single render attempt did.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudOutcome {
    Drawn(Vec<CloudWord>),
    Placeholder,
    /// Engine not ready; try again with `attempt` after `after`.
    RetryAfter { attempt: u32, after: Duration },
}

pub struct WordCloudRenderer {
    cfg: CloudConfig,
    rng: StdRng,
}

impl WordCloudRenderer {
    /// Renderer with an entropy-seeded palette picker.
    #[must_use]
    pub fn new(cfg: CloudConfig) -> Self {
        Self::with_seed(cfg, rand::random())
    }

    /// Deterministic color assignment, for tests and reproducible output.
    #[must_use]
    pub fn with_seed(cfg: CloudConfig, seed: u64) -> Self {
        Self {
            cfg,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CloudConfig {
        &self.cfg
    }

    /// `max(w, floor)^exponent * (width / reference_width)`.
    #[must_use]
    pub fn size_for(&self, weight: f64, container_width: f64) -> f64 {
        scaled_size(&self.cfg, weight, container_width)
    }

    /// Size and color keywords for a container `width` wide. Heaviest first;
    /// equal weights keep input order.
    pub fn layout(&mut self, keywords: &[KeywordWeight], width: f64) -> Vec<CloudWord> {
        let Self { cfg, rng } = self;
        let floor = cfg.weight_floor;
        let mut ranked: Vec<&KeywordWeight> = keywords.iter().collect();
        ranked.sort_by(|a, b| b.effective_weight(floor).total_cmp(&a.effective_weight(floor)));
        ranked.truncate(cfg.max_words);

        ranked
            .into_iter()
            .map(|kw| {
                let color = cfg
                    .palette
                    .choose(&mut *rng)
                    .map_or(NEUTRAL_COLOR, String::as_str)
                    .to_string();
                CloudWord {
                    text: kw.text.clone(),
                    weight: kw.weight,
                    effective_weight: kw.effective_weight(floor),
                    size: scaled_size(cfg, kw.weight, width),
                    color,
                }
            })
            .collect()
    }

    /// One render attempt into `area`; `attempt` counts from 1.
    ///
    /// Returns `RetryAfter` while the engine is not ready and attempts remain.
    /// The last failed attempt shows the unavailable placeholder and returns
    /// `DependencyNotReady`.
    pub fn render<H>(
        &mut self,
        host: &mut H,
        area: &str,
        keywords: &[KeywordWeight],
        has_data: bool,
        attempt: u32,
    ) -> Result<CloudOutcome>
    where
        H: Page + CloudEngine + ?Sized,
    {
        if !host.contains(area) {
            return Err(ReportError::missing_element(area));
        }
        if !has_data || keywords.is_empty() {
            show_placeholder(host, area, NO_KEYWORDS_TEXT)?;
            return Ok(CloudOutcome::Placeholder);
        }
        if !host.is_ready() {
            if attempt < self.cfg.max_attempts {
                return Ok(CloudOutcome::RetryAfter {
                    attempt: attempt + 1,
                    after: Duration::from_millis(self.cfg.retry_delay_ms),
                });
            }
            show_placeholder(host, area, UNAVAILABLE_TEXT)?;
            return Err(ReportError::DependencyNotReady {
                dependency: "word cloud engine",
                attempts: attempt,
            });
        }

        let width = host.area_width(area)?;
        let words = self.layout(keywords, width);
        host.set_text(area, "")?;
        host.draw(area, &words)?;
        host.toggle_class(area, NO_DATA_CLASS, false)?;
        Ok(CloudOutcome::Drawn(words))
    }
}

fn scaled_size(cfg: &CloudConfig, weight: f64, container_width: f64) -> f64 {
    weight.max(cfg.weight_floor).powf(cfg.exponent) * (container_width / cfg.reference_width)
}

fn show_placeholder<H>(host: &mut H, area: &str, text: &str) -> Result<()>
where
    H: Page + CloudEngine + ?Sized,
{
    host.clear(area)?;
    host.toggle_class(area, NO_DATA_CLASS, true)?;
    host.set_text(area, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessPage, PageLayout};

    fn renderer() -> WordCloudRenderer {
        WordCloudRenderer::with_seed(CloudConfig::default(), 7)
    }

    fn page() -> HeadlessPage {
        HeadlessPage::new(&PageLayout::default())
    }

    #[test]
    fn floor_lifts_low_weight_to_ten() {
        let mut r = renderer();
        let words = r.layout(&[KeywordWeight::new("뱀", 3.0)], 600.0);
        assert!((words[0].effective_weight - 10.0).abs() < 1e-9);
        assert!((words[0].size - 10f64.powf(1.3)).abs() < 1e-9);
    }

    #[test]
    fn size_scales_with_container_width() {
        let r = renderer();
        let full = r.size_for(20.0, 600.0);
        let half = r.size_for(20.0, 300.0);
        assert!((full - 2.0 * half).abs() < 1e-9);
        assert!(r.size_for(40.0, 600.0) > 2.0 * full);
    }

    #[test]
    fn layout_orders_by_weight_and_truncates() {
        let cfg = CloudConfig {
            max_words: 2,
            ..CloudConfig::default()
        };
        let mut r = WordCloudRenderer::with_seed(cfg, 1);
        let words = r.layout(
            &[
                KeywordWeight::new("a", 1.0),
                KeywordWeight::new("b", 30.0),
                KeywordWeight::new("c", 5.0),
                KeywordWeight::new("d", 30.0),
            ],
            600.0,
        );
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "d"]);
    }

    #[test]
    fn colors_come_from_palette() {
        let mut r = renderer();
        let keywords: Vec<KeywordWeight> =
            (0..20).map(|i| KeywordWeight::new(format!("k{i}"), 12.0)).collect();
        let words = r.layout(&keywords, 600.0);
        let palette = &CloudConfig::default().palette;
        assert!(words.iter().all(|w| palette.contains(&w.color)));
    }

    #[test]
    fn same_seed_same_colors() {
        let keywords = vec![KeywordWeight::new("a", 12.0), KeywordWeight::new("b", 15.0)];
        let first = renderer().layout(&keywords, 600.0);
        let second = renderer().layout(&keywords, 600.0);
        assert_eq!(first, second);
    }

    #[test]
    fn no_data_marks_area_and_skips_layout() {
        let mut page = page();
        let outcome = renderer()
            .render(&mut page, "wordCloud", &[KeywordWeight::new("a", 1.0)], false, 1)
            .expect("render");
        assert_eq!(outcome, CloudOutcome::Placeholder);
        assert!(page.has_class("wordCloud", NO_DATA_CLASS));
        assert_eq!(page.text("wordCloud"), Some(NO_KEYWORDS_TEXT));
        assert!(page.cloud_words("wordCloud").is_empty());
    }

    #[test]
    fn not_ready_retries_then_fails() {
        let mut page = page();
        page.set_cloud_ready_after(u32::MAX);
        let mut r = WordCloudRenderer::with_seed(
            CloudConfig {
                max_attempts: 3,
                ..CloudConfig::default()
            },
            1,
        );
        let keywords = [KeywordWeight::new("a", 12.0)];
        let first = r.render(&mut page, "wordCloud", &keywords, true, 1).expect("attempt 1");
        assert_eq!(
            first,
            CloudOutcome::RetryAfter {
                attempt: 2,
                after: Duration::from_millis(100)
            }
        );
        let err = r
            .render(&mut page, "wordCloud", &keywords, true, 3)
            .expect_err("final attempt");
        assert!(matches!(err, ReportError::DependencyNotReady { attempts: 3, .. }));
        assert_eq!(page.text("wordCloud"), Some(UNAVAILABLE_TEXT));
    }

    #[test]
    fn successful_draw_clears_no_data_state() {
        let mut page = page();
        let mut r = renderer();
        r.render(&mut page, "wordCloud", &[], true, 1).expect("placeholder");
        assert!(page.has_class("wordCloud", NO_DATA_CLASS));

        let outcome = r
            .render(&mut page, "wordCloud", &[KeywordWeight::new("물", 12.0)], true, 1)
            .expect("draw");
        assert!(matches!(outcome, CloudOutcome::Drawn(ref words) if words.len() == 1));
        assert!(!page.has_class("wordCloud", NO_DATA_CLASS));
        assert_eq!(page.cloud_words("wordCloud").len(), 1);
    }

    #[test]
    fn missing_area_is_reported() {
        let mut page = page();
        let err = renderer()
            .render(&mut page, "nowhere", &[], true, 1)
            .expect_err("missing");
        assert_eq!(err.code(), "DLR-3001");
    }
}
