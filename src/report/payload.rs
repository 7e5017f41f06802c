//! Injected report payload: wire format, validation, and the report period.
//!
//! The host renders one payload per page view. [`ReportInput`] is the
//! validated, immutable form handed to the dashboard controller; anything
//! that fails validation degrades to a no-data input instead of an error
//! when ingested leniently.

use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::core::errors::{ReportError, Result};
use crate::report::series::{CategorySeries, EmotionCount, KeywordWeight, validate_count};

// ──────────────────── period ────────────────────

/// Year/month the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Validated constructor: year in `1..=9999`, month in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=9999).contains(&year) {
            return Err(ReportError::InvalidPeriod {
                details: format!("year {year} outside 1..=9999"),
            });
        }
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidPeriod {
                details: format!("month {month} outside 1..=12"),
            });
        }
        Ok(Self { year, month })
    }

    /// Month containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Parse `YYYYMM`, `YYYY-MM` or `YYYY/MM`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (year, month) = match trimmed.split_once(['-', '/']) {
            Some(parts) => parts,
            None if trimmed.len() == 6 && trimmed.is_char_boundary(4) => trimmed.split_at(4),
            None => {
                return Err(ReportError::InvalidPeriod {
                    details: format!("{raw:?} is not YYYYMM"),
                });
            }
        };
        let year = year.parse::<i32>().map_err(|e| ReportError::InvalidPeriod {
            details: format!("year in {raw:?}: {e}"),
        })?;
        let month = month.parse::<u32>().map_err(|e| ReportError::InvalidPeriod {
            details: format!("month in {raw:?}: {e}"),
        })?;
        Self::new(year, month)
    }

    /// Host path of this period's report page.
    #[must_use]
    pub fn report_path(&self) -> String {
        format!("/report/{:04}{:02}/", self.year, self.month)
    }

    /// Compact `YYYYMM` key, as used for payload file names.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    /// Month before this one; January rolls back to December. Saturates at 0001/01.
    #[must_use]
    pub fn previous(self) -> Self {
        match (self.year, self.month) {
            (1, 1) => self,
            (year, 1) => Self {
                year: year - 1,
                month: 12,
            },
            (year, month) => Self {
                year,
                month: month - 1,
            },
        }
    }

    /// Month after this one; December rolls over to January. Saturates at 9999/12.
    #[must_use]
    pub fn next(self) -> Self {
        match (self.year, self.month) {
            (9999, 12) => self,
            (year, 12) => Self {
                year: year + 1,
                month: 1,
            },
            (year, month) => Self {
                year,
                month: month + 1,
            },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

// ──────────────────── wire payload ────────────────────

/// Keyword entry as injected: either `["text", weight]` or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordEntry {
    Pair(String, f64),
    Object { text: String, weight: f64 },
}

impl From<KeywordEntry> for KeywordWeight {
    fn from(entry: KeywordEntry) -> Self {
        match entry {
            KeywordEntry::Pair(text, weight) | KeywordEntry::Object { text, weight } => {
                Self { text, weight }
            }
        }
    }
}

/// Aggregate payload exactly as the host page injects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    #[serde(default)]
    pub has_data: bool,
    pub period: Period,
    #[serde(default)]
    pub dream_labels: Vec<String>,
    #[serde(default)]
    pub dream_data: Vec<f64>,
    #[serde(default)]
    pub emotion_labels: Vec<String>,
    #[serde(default)]
    pub emotion_icons: Vec<String>,
    #[serde(default)]
    pub emotion_data: Vec<f64>,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
}

// ──────────────────── validated input ────────────────────

/// Immutable, validated dashboard input for one page view.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    has_data: bool,
    period: Period,
    dream: CategorySeries,
    emotions: Vec<EmotionCount>,
    keywords: Vec<KeywordWeight>,
}

/// Result of lenient ingestion: always an input, plus the reason it was
/// degraded when validation failed.
#[derive(Debug)]
pub struct Ingested {
    pub input: ReportInput,
    pub issue: Option<ReportError>,
}

impl ReportInput {
    /// Input with no data for `period`.
    #[must_use]
    pub fn no_data(period: Period) -> Self {
        Self {
            has_data: false,
            period,
            dream: CategorySeries::default(),
            emotions: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Validate a decoded payload.
    pub fn from_payload(payload: ReportPayload) -> Result<Self> {
        let period = Period::new(payload.period.year, payload.period.month)?;
        let dream = CategorySeries::from_parallel(&payload.dream_labels, &payload.dream_data)?;

        let n = payload.emotion_labels.len();
        if payload.emotion_icons.len() != n || payload.emotion_data.len() != n {
            return Err(ReportError::malformed(format!(
                "emotion arrays differ in length: labels={n}, icons={}, data={}",
                payload.emotion_icons.len(),
                payload.emotion_data.len()
            )));
        }
        let mut emotions = Vec::with_capacity(n);
        for ((label, icon), count) in payload
            .emotion_labels
            .into_iter()
            .zip(payload.emotion_icons)
            .zip(payload.emotion_data)
        {
            validate_count(&label, count)?;
            emotions.push(EmotionCount { label, icon, count });
        }

        let mut keywords = Vec::with_capacity(payload.keywords.len());
        for entry in payload.keywords {
            let keyword = KeywordWeight::from(entry);
            validate_count(&keyword.text, keyword.weight)?;
            keywords.push(keyword);
        }

        Ok(Self {
            has_data: payload.has_data,
            period,
            dream,
            emotions,
            keywords,
        })
    }

    /// Strict JSON ingestion.
    pub fn from_json(raw: &str) -> Result<Self> {
        let payload: ReportPayload = serde_json::from_str(raw)
            .map_err(|e| ReportError::malformed(format!("payload does not decode: {e}")))?;
        Self::from_payload(payload)
    }

    /// Lenient JSON ingestion: malformed payloads degrade to no-data.
    ///
    /// The payload's own period is kept when it is recoverable; otherwise
    /// `fallback` is used.
    #[must_use]
    pub fn from_json_lenient(raw: &str, fallback: Period) -> Ingested {
        match Self::from_json(raw) {
            Ok(input) => Ingested { input, issue: None },
            Err(issue) => {
                let period = recover_period(raw).unwrap_or(fallback);
                Ingested {
                    input: Self::no_data(period),
                    issue: Some(issue),
                }
            }
        }
    }

    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.has_data
    }

    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub const fn dream(&self) -> &CategorySeries {
        &self.dream
    }

    #[must_use]
    pub fn emotions(&self) -> &[EmotionCount] {
        &self.emotions
    }

    #[must_use]
    pub fn keywords(&self) -> &[KeywordWeight] {
        &self.keywords
    }
}

fn recover_period(raw: &str) -> Option<Period> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let period = value.get("period")?;
    let year = i32::try_from(period.get("year")?.as_i64()?).ok()?;
    let month = u32::try_from(period.get("month")?.as_u64()?).ok()?;
    Period::new(year, month).ok()
}
