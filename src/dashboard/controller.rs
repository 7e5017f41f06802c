//! Dashboard controller: applies reducer effects to the host page.
//!
//! Each panel renders independently. A failure in one (a missing element,
//! a cloud engine that never loads) is logged and skipped; the other panel
//! and the tab/dropdown handlers keep working.

use std::time::Duration;

use crate::core::config::Config;
use crate::core::errors::ReportError;
use crate::host::{ChartBackend, CloudEngine, Page, PageLayout};
use crate::logger::jsonl::{EventType, LogEntry, Severity};
use crate::logger::{ActivityLog, MemoryLog};
use crate::report::aggregate::{build_dream_view_model, build_emotion_view_model};
use crate::report::chart::{ChartRenderer, ChartSpec};
use crate::report::classify::EmotionClassifier;
use crate::report::cloud::{CloudOutcome, WordCloudRenderer};
use crate::report::payload::{Ingested, Period, ReportInput};
use crate::report::series::ChartViewModel;

use super::model::{DashboardCmd, DashboardMsg, DashboardState, Effect, Tab};
use super::update::update;

/// Class marking the active tab button.
pub const ACTIVE_CLASS: &str = "active";

/// Summary shown whenever the period has no entries.
#[must_use]
pub fn no_entries_message(period: Period) -> String {
    format!("no entries for {period}")
}

/// Summary naming the most frequent category.
#[must_use]
pub fn most_frequent_message(label: &str) -> String {
    format!("most frequent: {label}")
}

/// Orchestrates tab and dropdown state over a host page.
pub struct DashboardController<H, L = MemoryLog> {
    input: ReportInput,
    state: DashboardState,
    host: H,
    charts: ChartRenderer,
    cloud: WordCloudRenderer,
    classifier: EmotionClassifier,
    layout: PageLayout,
    log: L,
}

impl<H, L> DashboardController<H, L>
where
    H: Page + ChartBackend + CloudEngine,
    L: ActivityLog,
{
    #[must_use]
    pub fn new(input: ReportInput, host: H, config: &Config, log: L) -> Self {
        let state = DashboardState::new(input.has_data(), input.period());
        Self {
            input,
            state,
            host,
            charts: ChartRenderer::new(config.chart.clone()),
            cloud: WordCloudRenderer::new(config.cloud.clone()),
            classifier: EmotionClassifier::from_config(&config.emotion),
            layout: PageLayout::default(),
            log,
        }
    }

    /// Controller over a leniently ingested payload; a degraded payload is
    /// logged as `malformed_input`.
    #[must_use]
    pub fn from_ingested(ingested: Ingested, host: H, config: &Config, mut log: L) -> Self {
        if let Some(issue) = &ingested.issue {
            log.record(
                LogEntry::new(EventType::MalformedInput, Severity::Warning)
                    .with_period(ingested.input.period())
                    .with_error(issue),
            );
        }
        Self::new(ingested.input, host, config, log)
    }

    #[must_use]
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Reproducible keyword colors.
    #[must_use]
    pub fn with_cloud_seed(mut self, seed: u64) -> Self {
        self.cloud = WordCloudRenderer::with_seed(self.cloud.config().clone(), seed);
        self
    }

    /// Paint the initial state: dream tab, closed dropdown, keyword cloud.
    pub fn start(&mut self) -> DashboardCmd {
        self.log.record(
            LogEntry::new(EventType::DashboardStart, Severity::Info)
                .with_period(self.state.period)
                .with_details(if self.state.has_data { "has_data" } else { "no_data" }),
        );
        let effects = vec![
            Effect::ShowTab(self.state.active_tab),
            Effect::SyncDropdown,
            Effect::SyncPeriodLabel,
            Effect::RenderCloud { attempt: 1 },
        ];
        self.apply(effects)
    }

    /// Handle one event.
    pub fn update(&mut self, msg: DashboardMsg) -> DashboardCmd {
        match &msg {
            DashboardMsg::ToggleDropdown | DashboardMsg::ClickOutside => {
                let was_open = self.state.dropdown_open;
                let effects = update(&mut self.state, msg);
                if was_open != self.state.dropdown_open {
                    self.log.record(
                        LogEntry::new(EventType::DropdownToggle, Severity::Info).with_details(
                            if self.state.dropdown_open { "open" } else { "closed" },
                        ),
                    );
                }
                self.apply(effects)
            }
            DashboardMsg::SelectTab(tab) => {
                self.log.record(
                    LogEntry::new(EventType::TabSwitch, Severity::Info)
                        .with_tab(tab.key())
                        .with_period(self.state.period),
                );
                let effects = update(&mut self.state, msg);
                self.apply(effects)
            }
            _ => {
                let effects = update(&mut self.state, msg);
                self.apply(effects)
            }
        }
    }

    pub fn select_tab(&mut self, tab: Tab) -> DashboardCmd {
        self.update(DashboardMsg::SelectTab(tab))
    }

    pub fn toggle_dropdown(&mut self) -> DashboardCmd {
        self.update(DashboardMsg::ToggleDropdown)
    }

    pub fn click_outside(&mut self) -> DashboardCmd {
        self.update(DashboardMsg::ClickOutside)
    }

    pub fn navigate(&mut self, year: i32, month: u32) -> DashboardCmd {
        self.update(DashboardMsg::Navigate { year, month })
    }

    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub const fn input(&self) -> &ReportInput {
        &self.input
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn layout(&self) -> &PageLayout {
        &self.layout
    }

    #[must_use]
    pub const fn log(&self) -> &L {
        &self.log
    }

    /// View model behind `tab`; placeholders without data.
    #[must_use]
    pub fn view_model(&self, tab: Tab) -> ChartViewModel {
        if !self.state.has_data {
            return ChartViewModel::placeholder();
        }
        match tab {
            Tab::Dream => build_dream_view_model(self.input.dream()),
            Tab::Emotion => build_emotion_view_model(self.input.emotions(), &self.classifier),
        }
    }

    /// Release every live chart, returning the host.
    pub fn into_host(self) -> H {
        self.into_parts().0
    }

    /// Release every live chart, returning the host and the log.
    pub fn into_parts(mut self) -> (H, L) {
        self.charts.release_all(&mut self.host);
        (self.host, self.log)
    }

    // ──────────────────── effects ────────────────────

    fn apply(&mut self, effects: Vec<Effect>) -> DashboardCmd {
        let cmds = effects.into_iter().map(|e| self.apply_one(e)).collect();
        DashboardCmd::batch(cmds)
    }

    fn apply_one(&mut self, effect: Effect) -> DashboardCmd {
        match effect {
            Effect::ShowTab(tab) => {
                self.show_tab(tab);
                DashboardCmd::None
            }
            Effect::SyncDropdown => {
                let result = self
                    .host
                    .set_visible(&self.layout.dropdown, self.state.dropdown_open);
                self.isolate(result, None);
                DashboardCmd::None
            }
            Effect::SyncPeriodLabel => {
                let result = self.host.set_text(
                    &self.layout.period_label,
                    &self.state.pending_period.to_string(),
                );
                self.isolate(result, None);
                DashboardCmd::None
            }
            Effect::RenderCloud { attempt } => self.render_cloud(attempt),
            Effect::Navigate { path } => {
                self.log.record(
                    LogEntry::new(EventType::Navigate, Severity::Info)
                        .with_period(self.state.pending_period)
                        .with_details(path.clone()),
                );
                self.host.navigate(&path);
                DashboardCmd::Navigate { path }
            }
            Effect::Rejected { reason } => {
                self.log.record(
                    LogEntry::new(EventType::Navigate, Severity::Warning).with_details(reason),
                );
                DashboardCmd::None
            }
        }
    }

    fn show_tab(&mut self, tab: Tab) {
        for candidate in Tab::ALL {
            let (button, panel) = self.tab_elements(candidate);
            let active = candidate == tab;
            let result = self.host.toggle_class(&button, ACTIVE_CLASS, active);
            self.isolate(result, Some(tab));
            let result = self.host.set_visible(&panel, active);
            self.isolate(result, Some(tab));
        }

        let vm = self.view_model(tab);
        let canvas = match tab {
            Tab::Dream => self.layout.dream_canvas.clone(),
            Tab::Emotion => self.layout.emotion_canvas.clone(),
        };
        match self
            .charts
            .render(&mut self.host, &canvas, &vm, self.state.has_data)
        {
            Ok(spec) => self.log_chart(&canvas, tab, &spec),
            Err(err) => self.isolate(Err(err), Some(tab)),
        }

        let summary = if self.state.has_data {
            vm.most_frequent_label()
                .map_or_else(|| no_entries_message(self.state.period), most_frequent_message)
        } else {
            no_entries_message(self.state.period)
        };
        let result = self.host.set_text(&self.layout.summary, &summary);
        self.isolate(result, Some(tab));
        self.state.summary = summary;
    }

    fn render_cloud(&mut self, attempt: u32) -> DashboardCmd {
        let area = self.layout.cloud_area.clone();
        let outcome = self.cloud.render(
            &mut self.host,
            &area,
            self.input.keywords(),
            self.state.has_data,
            attempt,
        );
        match outcome {
            Ok(CloudOutcome::Drawn(words)) => {
                self.log.record(
                    LogEntry::new(EventType::CloudRender, Severity::Info)
                        .with_panel(area)
                        .with_attempt(attempt)
                        .with_details(format!("{} words", words.len())),
                );
                DashboardCmd::None
            }
            Ok(CloudOutcome::Placeholder) => {
                self.log.record(
                    LogEntry::new(EventType::CloudRender, Severity::Info)
                        .with_panel(area)
                        .with_details("placeholder"),
                );
                DashboardCmd::None
            }
            Ok(CloudOutcome::RetryAfter { attempt, after }) => {
                self.log.record(
                    LogEntry::new(EventType::CloudRetry, Severity::Info)
                        .with_panel(area)
                        .with_attempt(attempt),
                );
                self.state.cloud_retry_pending = Some(attempt);
                DashboardCmd::ScheduleCloudRetry { attempt, after }
            }
            Err(err) => {
                self.isolate(Err(err), None);
                DashboardCmd::None
            }
        }
    }

    fn tab_elements(&self, tab: Tab) -> (String, String) {
        match tab {
            Tab::Dream => (self.layout.dream_tab.clone(), self.layout.dream_panel.clone()),
            Tab::Emotion => (
                self.layout.emotion_tab.clone(),
                self.layout.emotion_panel.clone(),
            ),
        }
    }

    fn log_chart(&mut self, canvas: &str, tab: Tab, spec: &ChartSpec) {
        self.log.record(
            LogEntry::new(EventType::ChartRender, Severity::Info)
                .with_panel(canvas)
                .with_tab(tab.key())
                .with_period(self.state.period)
                .with_details(format!("{} segments", spec.labels.len())),
        );
    }

    /// Log a failed page operation; the caller carries on.
    fn isolate(&mut self, result: crate::core::errors::Result<()>, tab: Option<Tab>) {
        let Err(err) = result else {
            return;
        };
        let (event, severity, panel) = match &err {
            ReportError::MissingElement { element } => {
                (EventType::MissingElement, Severity::Warning, Some(element.clone()))
            }
            ReportError::DependencyNotReady { .. } => {
                (EventType::DependencyNotReady, Severity::Error, None)
            }
            _ => (EventType::RenderFailure, Severity::Error, None),
        };
        let mut entry = LogEntry::new(event, severity).with_error(&err);
        if let Some(panel) = panel {
            entry = entry.with_panel(panel);
        }
        if let Some(tab) = tab {
            entry = entry.with_tab(tab.key());
        }
        self.log.record(entry);
    }
}

/// Retry delay the runtime should honor for `cmd`, if it schedules one.
#[must_use]
pub fn retry_delay(cmd: &DashboardCmd) -> Option<Duration> {
    cmd.clone().flatten().into_iter().find_map(|c| match c {
        DashboardCmd::ScheduleCloudRetry { after, .. } => Some(after),
        _ => None,
    })
}
