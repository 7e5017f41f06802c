//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use dreamlens_report::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{ReportError, Result};

// Report
pub use crate::report::aggregate::{DreamType, build_dream_view_model, build_emotion_view_model};
pub use crate::report::chart::{ChartRenderer, ChartSpec};
pub use crate::report::classify::EmotionClassifier;
pub use crate::report::cloud::{CloudOutcome, WordCloudRenderer};
pub use crate::report::payload::{Ingested, Period, ReportInput, ReportPayload};
pub use crate::report::series::{CategorySeries, ChartViewModel, EmotionCount, KeywordWeight};

// Host
pub use crate::host::{ChartBackend, CloudEngine, HeadlessPage, Page, PageLayout};

// Dashboard
pub use crate::dashboard::runtime::{Scheduler, settle};
pub use crate::dashboard::{DashboardCmd, DashboardController, DashboardMsg, DashboardState, Tab};

// Logger
pub use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry};
pub use crate::logger::{ActivityLog, MemoryLog, NullLog};
