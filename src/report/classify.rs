//! Emotion label → color classification over an ordered substring rule table.

use serde::{Deserialize, Serialize};

use crate::core::config::EmotionConfig;

/// Color for labels no rule matches.
pub const DEFAULT_EMOTION_COLOR: &str = "#cccccc";

/// Built-in rule table, evaluated top to bottom.
const DEFAULT_RULES: [(&str, &str); 16] = [
    ("기쁨", "#FFD700"),
    ("행복", "#FFD700"),
    ("설렘", "#FF8C00"),
    ("즐거움", "#FF8C00"),
    ("평온", "#87CEEB"),
    ("무감정", "#808080"),
    ("불안", "#8A2BE2"),
    ("걱정", "#8A2BE2"),
    ("공포", "#4B0082"),
    ("두려움", "#4B0082"),
    ("슬픔", "#1E90FF"),
    ("외로움", "#1E90FF"),
    ("분노", "#DC143C"),
    ("짜증", "#DC143C"),
    ("기억", "#A9A9A9"),
    ("복합적", "#A9A9A9"),
];

/// One `(substring pattern, color)` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRule {
    pub pattern: String,
    pub color: String,
}

impl ColorRule {
    #[must_use]
    pub fn new(pattern: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            color: color.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        label.contains(self.pattern.as_str())
    }
}

/// First-match-wins classifier. Rule order is the declared order; nothing
/// is sorted or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionClassifier {
    rules: Vec<ColorRule>,
    default_color: String,
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self::with_rules(Self::default_rules(), DEFAULT_EMOTION_COLOR)
    }
}

impl EmotionClassifier {
    #[must_use]
    pub fn default_rules() -> Vec<ColorRule> {
        DEFAULT_RULES
            .iter()
            .map(|(pattern, color)| ColorRule::new(*pattern, *color))
            .collect()
    }

    #[must_use]
    pub fn with_rules(rules: Vec<ColorRule>, default_color: impl Into<String>) -> Self {
        Self {
            rules,
            default_color: default_color.into(),
        }
    }

    /// Built from the `[emotion]` config section; the built-in table is used
    /// unless the section supplies its own rules.
    #[must_use]
    pub fn from_config(cfg: &EmotionConfig) -> Self {
        let rules = cfg.rules.as_ref().map_or_else(Self::default_rules, |rules| {
            rules
                .iter()
                .map(|r| ColorRule::new(r.pattern.clone(), r.color.clone()))
                .collect()
        });
        Self::with_rules(rules, cfg.default_color.clone())
    }

    /// Color of the first rule whose pattern occurs in `label`.
    #[must_use]
    pub fn color_for(&self, label: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(label))
            .map_or(self.default_color.as_str(), |rule| rule.color.as_str())
    }

    #[must_use]
    pub fn rules(&self) -> &[ColorRule] {
        &self.rules
    }

    #[must_use]
    pub fn default_color(&self) -> &str {
        &self.default_color
    }
}

/// `#rgb` or `#rrggbb`.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
