//! Dream-type and emotion view-model construction.

use serde::{Deserialize, Serialize};

use crate::report::classify::EmotionClassifier;
use crate::report::series::{CategorySeries, ChartViewModel, EmotionCount};

/// Fixed dream-type domain, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DreamType {
    Good,
    Bad,
    Normal,
}

impl DreamType {
    pub const CANONICAL: [Self; 3] = [Self::Good, Self::Bad, Self::Normal];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Normal => "normal",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "길몽",
            Self::Bad => "흉몽",
            Self::Normal => "일반몽",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#28a745",
            Self::Bad => "#dc3545",
            Self::Normal => "#6c757d",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::CANONICAL.into_iter().find(|t| t.key() == key)
    }
}

/// Display label for a dream-type key; unmapped keys fall back to themselves.
#[must_use]
pub fn label_for(key: &str) -> &str {
    DreamType::from_key(key).map_or(key, |t| t.label())
}

/// Canonically ordered dream-type view model.
///
/// Always three entries in `good, bad, normal` order. Absent types count as
/// zero and keys outside the domain are dropped. A series with no in-domain
/// entries yields the placeholder.
#[must_use]
pub fn build_dream_view_model(series: &CategorySeries) -> ChartViewModel {
    if !series.iter().any(|(key, _)| DreamType::from_key(key).is_some()) {
        return ChartViewModel::placeholder();
    }
    let mut vm = ChartViewModel {
        labels: Vec::with_capacity(3),
        values: Vec::with_capacity(3),
        colors: Vec::with_capacity(3),
    };
    for dream_type in DreamType::CANONICAL {
        vm.labels.push(dream_type.label().to_string());
        vm.values
            .push(series.count_of(dream_type.key()).unwrap_or(0.0));
        vm.colors.push(dream_type.color().to_string());
    }
    vm
}

/// Emotion view model in payload order, labels as `"{icon} {label}"`.
#[must_use]
pub fn build_emotion_view_model(
    emotions: &[EmotionCount],
    classifier: &EmotionClassifier,
) -> ChartViewModel {
    if emotions.is_empty() {
        return ChartViewModel::placeholder();
    }
    let mut vm = ChartViewModel {
        labels: Vec::with_capacity(emotions.len()),
        values: Vec::with_capacity(emotions.len()),
        colors: Vec::with_capacity(emotions.len()),
    };
    for emotion in emotions {
        let label = emotion.display_label();
        vm.colors.push(classifier.color_for(&label).to_string());
        vm.labels.push(label);
        vm.values.push(emotion.count);
    }
    vm
}
