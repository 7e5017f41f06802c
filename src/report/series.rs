//! Category series, keyword weights and the renderer-facing chart view model.

use serde::{Deserialize, Serialize};

use crate::core::errors::{ReportError, Result};

/// Neutral gray used for placeholders and unclassified labels.
pub const NEUTRAL_COLOR: &str = "#cccccc";

/// Label of the single placeholder segment.
pub const PLACEHOLDER_LABEL: &str = "no data";

/// Ordered `(category key, count)` pairs as injected by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    entries: Vec<(String, f64)>,
}

impl CategorySeries {
    /// Zip parallel key/count arrays. Lengths must match and counts must be
    /// finite and non-negative.
    pub fn from_parallel(keys: &[String], counts: &[f64]) -> Result<Self> {
        if keys.len() != counts.len() {
            return Err(ReportError::malformed(format!(
                "category keys ({}) and counts ({}) differ in length",
                keys.len(),
                counts.len()
            )));
        }
        let mut entries = Vec::with_capacity(keys.len());
        for (key, &count) in keys.iter().zip(counts) {
            validate_count(key, count)?;
            entries.push((key.clone(), count));
        }
        Ok(Self { entries })
    }

    /// Count for `key`; the first occurrence wins when a key repeats.
    #[must_use]
    pub fn count_of(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f64)> for CategorySeries {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One emotion bucket: free-text label, its icon and the entry count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionCount {
    pub label: String,
    pub icon: String,
    pub count: f64,
}

impl EmotionCount {
    /// Label as shown in the legend: icon, a space, then the emotion text.
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.icon.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.icon, self.label)
        }
    }
}

/// A cloud keyword and its raw frequency weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub text: String,
    pub weight: f64,
}

impl KeywordWeight {
    #[must_use]
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }

    /// Weight after the display floor is applied.
    #[must_use]
    pub fn effective_weight(&self, floor: f64) -> f64 {
        self.weight.max(floor)
    }
}

/// Renderer-ready triple of equal-length sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewModel {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartViewModel {
    /// Single neutral segment standing in for an empty series.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            labels: vec![PLACEHOLDER_LABEL.to_string()],
            values: vec![1.0],
            colors: vec![NEUTRAL_COLOR.to_string()],
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the largest value; ties resolve to the earliest index.
    ///
    /// Returns `None` for placeholders and when no value is above zero.
    #[must_use]
    pub fn argmax(&self) -> Option<usize> {
        if self.is_placeholder() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (idx, &value) in self.values.iter().enumerate() {
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((idx, value)),
            }
        }
        best.filter(|(_, value)| *value > 0.0).map(|(idx, _)| idx)
    }

    /// Label of the most frequent category, per [`Self::argmax`].
    #[must_use]
    pub fn most_frequent_label(&self) -> Option<&str> {
        self.argmax().map(|idx| self.labels[idx].as_str())
    }
}

pub(crate) fn validate_count(key: &str, count: f64) -> Result<()> {
    if count.is_finite() && count >= 0.0 {
        Ok(())
    } else {
        Err(ReportError::malformed(format!(
            "count for {key:?} must be finite and non-negative, got {count}"
        )))
    }
}
