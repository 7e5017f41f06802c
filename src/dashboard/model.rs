//! Elm-style state model for the report dashboard.
//!
//! [`DashboardState`] holds everything the dashboard displays. Input arrives
//! as [`DashboardMsg`] values; the pure [`update`](super::update::update)
//! turns each into [`Effect`]s the controller applies to the page, and the
//! controller hands [`DashboardCmd`]s back to the runtime.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::report::payload::Period;

// ──────────────────── tabs ────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dream,
    Emotion,
}

impl Tab {
    pub const ALL: [Self; 2] = [Self::Dream, Self::Emotion];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dream => "dream",
            Self::Emotion => "emotion",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Dream => Self::Emotion,
            Self::Emotion => Self::Dream,
        }
    }

    /// 1-based hotkey mapping.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dream),
            2 => Some(Self::Emotion),
            _ => None,
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dream" | "type" => Some(Self::Dream),
            "emotion" => Some(Self::Emotion),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ──────────────────── state ────────────────────

/// Page-scoped dashboard state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    pub active_tab: Tab,
    pub dropdown_open: bool,
    pub has_data: bool,
    /// Period currently displayed.
    pub period: Period,
    /// Period chosen in the open dropdown, not yet confirmed.
    pub pending_period: Period,
    /// Summary line currently shown.
    pub summary: String,
    /// Attempt number of the cloud retry awaiting its timer, if any.
    pub cloud_retry_pending: Option<u32>,
}

impl DashboardState {
    /// Initial state: dream tab, dropdown closed.
    #[must_use]
    pub fn new(has_data: bool, period: Period) -> Self {
        Self {
            active_tab: Tab::Dream,
            dropdown_open: false,
            has_data,
            period,
            pending_period: period,
            summary: String::new(),
            cloud_retry_pending: None,
        }
    }
}

// ──────────────────── messages ────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardMsg {
    SelectTab(Tab),
    ToggleDropdown,
    /// A click landed outside the dropdown.
    ClickOutside,
    /// Pick a period in the open dropdown.
    SelectPeriod(Period),
    PreviousMonth,
    NextMonth,
    /// Confirm the dropdown's pending period.
    ConfirmNavigation,
    /// Navigate straight to a period.
    Navigate { year: i32, month: u32 },
    /// The cloud container changed width.
    Resize { width: f64 },
    /// A scheduled cloud readiness retry fired.
    CloudRetry { attempt: u32 },
}

// ──────────────────── effects ────────────────────

/// Page work requested by the reducer, applied by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Activate the tab, render its chart and recompute the summary.
    ShowTab(Tab),
    /// Reflect `dropdown_open` on the page.
    SyncDropdown,
    /// Reflect `pending_period` on the page.
    SyncPeriodLabel,
    RenderCloud { attempt: u32 },
    Navigate { path: String },
    /// The message was rejected without a state change.
    Rejected { reason: String },
}

// ──────────────────── commands ────────────────────

/// Side effects for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCmd {
    None,
    Batch(Vec<Self>),
    /// Deliver `CloudRetry { attempt }` after `after`.
    ScheduleCloudRetry { attempt: u32, after: Duration },
    /// Page control was handed to `path`.
    Navigate { path: String },
}

impl DashboardCmd {
    /// Collapse a list of commands, dropping `None`s.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| *c != Self::None).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Flatten nested batches in execution order.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

// ──────────────────── tests ────────────────────
