//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{ReportError, Result};
use crate::report::chart::{ChartKind, LegendPosition};
use crate::report::classify::is_hex_color;

/// Full dashboard configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub chart: ChartConfig,
    pub cloud: CloudConfig,
    pub emotion: EmotionConfig,
    pub paths: PathsConfig,
}

/// Proportional chart styling shared by the dream and emotion panels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// One chart kind for both series.
    pub kind: ChartKind,
    /// Inner radius for doughnut charts, percent of the outer radius.
    pub cutout_pct: f64,
    pub border_width: u32,
    pub legend: LegendPosition,
}

/// Keyword cloud sizing, palette and dependency-retry policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudConfig {
    /// Minimum displayable keyword weight.
    pub weight_floor: f64,
    /// Super-linear emphasis applied to the floored weight.
    pub exponent: f64,
    /// Container width at which sizes are used unscaled.
    pub reference_width: f64,
    /// Delay between readiness checks of the cloud engine.
    pub retry_delay_ms: u64,
    /// Total readiness checks before the render is declared failed.
    pub max_attempts: u32,
    /// Keywords beyond this count (by weight) are not drawn.
    pub max_words: usize,
    pub palette: Vec<String>,
}

/// One user-supplied emotion color rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorRuleConfig {
    pub pattern: String,
    pub color: String,
}

/// Emotion classification overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmotionConfig {
    /// Replaces the built-in rule table when present. Order is significant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<ColorRuleConfig>>,
    pub default_color: String,
}

/// Filesystem paths used by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub activity_log: PathBuf,
}

/// Vivid palette the keyword colors are drawn from.
pub const DEFAULT_CLOUD_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#ffb400", "#4363d8", "#f58231", "#911eb4", "#17becf", "#f032e6",
];

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::Doughnut,
            cutout_pct: 50.0,
            border_width: 1,
            legend: LegendPosition::Bottom,
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            weight_floor: 10.0,
            exponent: 1.3,
            reference_width: 600.0,
            retry_delay_ms: 100,
            max_attempts: 20,
            max_words: 80,
            palette: DEFAULT_CLOUD_PALETTE
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
        }
    }
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            rules: None,
            default_color: crate::report::classify::DEFAULT_EMOTION_COLOR.to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[DLR-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir
                .join(".config")
                .join("dreamlens")
                .join("report.toml"),
            activity_log: home_dir
                .join(".local")
                .join("share")
                .join("dreamlens")
                .join("report-activity.jsonl"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| ReportError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if path.is_some() {
            return Err(ReportError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("DLR_CHART_KIND") {
            self.chart.kind = match raw.trim().to_ascii_lowercase().as_str() {
                "doughnut" => ChartKind::Doughnut,
                "pie" => ChartKind::Pie,
                other => {
                    return Err(ReportError::ConfigParse {
                        context: "env",
                        details: format!("DLR_CHART_KIND={other:?}: expected doughnut or pie"),
                    });
                }
            };
        }
        if let Some(raw) = lookup("DLR_CHART_CUTOUT_PCT") {
            self.chart.cutout_pct = parse_env("DLR_CHART_CUTOUT_PCT", &raw)?;
        }

        if let Some(raw) = lookup("DLR_CLOUD_WEIGHT_FLOOR") {
            self.cloud.weight_floor = parse_env("DLR_CLOUD_WEIGHT_FLOOR", &raw)?;
        }
        if let Some(raw) = lookup("DLR_CLOUD_EXPONENT") {
            self.cloud.exponent = parse_env("DLR_CLOUD_EXPONENT", &raw)?;
        }
        if let Some(raw) = lookup("DLR_CLOUD_REFERENCE_WIDTH") {
            self.cloud.reference_width = parse_env("DLR_CLOUD_REFERENCE_WIDTH", &raw)?;
        }
        if let Some(raw) = lookup("DLR_CLOUD_RETRY_DELAY_MS") {
            self.cloud.retry_delay_ms = parse_env("DLR_CLOUD_RETRY_DELAY_MS", &raw)?;
        }
        if let Some(raw) = lookup("DLR_CLOUD_MAX_ATTEMPTS") {
            self.cloud.max_attempts = parse_env("DLR_CLOUD_MAX_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("DLR_CLOUD_MAX_WORDS") {
            self.cloud.max_words = parse_env("DLR_CLOUD_MAX_WORDS", &raw)?;
        }

        if let Some(raw) = lookup("DLR_EMOTION_DEFAULT_COLOR") {
            self.emotion.default_color = raw.trim().to_string();
        }
        if let Some(raw) = lookup("DLR_ACTIVITY_LOG") {
            self.paths.activity_log = PathBuf::from(raw);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..100.0).contains(&self.chart.cutout_pct) {
            return Err(ReportError::InvalidConfig {
                details: format!(
                    "chart.cutout_pct must be in [0, 100), got {}",
                    self.chart.cutout_pct
                ),
            });
        }

        for (name, val) in [
            ("weight_floor", self.cloud.weight_floor),
            ("exponent", self.cloud.exponent),
            ("reference_width", self.cloud.reference_width),
        ] {
            if !val.is_finite() || val <= 0.0 {
                return Err(ReportError::InvalidConfig {
                    details: format!("cloud.{name} must be a positive number, got {val}"),
                });
            }
        }

        if self.cloud.max_attempts == 0 {
            return Err(ReportError::InvalidConfig {
                details: "cloud.max_attempts must be >= 1".to_string(),
            });
        }
        if self.cloud.max_words == 0 {
            return Err(ReportError::InvalidConfig {
                details: "cloud.max_words must be >= 1".to_string(),
            });
        }
        if self.cloud.palette.is_empty() {
            return Err(ReportError::InvalidConfig {
                details: "cloud.palette must contain at least one color".to_string(),
            });
        }
        for color in &self.cloud.palette {
            validate_color("cloud.palette", color)?;
        }

        validate_color("emotion.default_color", &self.emotion.default_color)?;
        if let Some(rules) = &self.emotion.rules {
            for rule in rules {
                if rule.pattern.is_empty() {
                    return Err(ReportError::InvalidConfig {
                        details: "emotion.rules pattern must not be empty".to_string(),
                    });
                }
                validate_color("emotion.rules", &rule.color)?;
            }
        }

        Ok(())
    }
}

fn validate_color(name: &str, value: &str) -> Result<()> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(ReportError::InvalidConfig {
            details: format!("{name} entry {value:?} is not a #rgb or #rrggbb color"),
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| ReportError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
