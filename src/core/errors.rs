//! DLR-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Top-level error type for the report dashboard.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("[DLR-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DLR-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[DLR-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DLR-2001] malformed report payload: {details}")]
    MalformedInput { details: String },

    #[error("[DLR-2002] invalid report period: {details}")]
    InvalidPeriod { details: String },

    #[error("[DLR-3001] render target missing: #{element}")]
    MissingElement { element: String },

    #[error("[DLR-3002] {dependency} not ready after {attempts} attempt(s)")]
    DependencyNotReady {
        dependency: &'static str,
        attempts: u32,
    },

    #[error("[DLR-3101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DLR-3201] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DLR-1001",
            Self::MissingConfig { .. } => "DLR-1002",
            Self::ConfigParse { .. } => "DLR-1003",
            Self::MalformedInput { .. } => "DLR-2001",
            Self::InvalidPeriod { .. } => "DLR-2002",
            Self::MissingElement { .. } => "DLR-3001",
            Self::DependencyNotReady { .. } => "DLR-3002",
            Self::Serialization { .. } => "DLR-3101",
            Self::Io { .. } => "DLR-3201",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::DependencyNotReady { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for a missing render target.
    #[must_use]
    pub fn missing_element(element: &str) -> Self {
        Self::MissingElement {
            element: element.to_owned(),
        }
    }

    /// Convenience constructor for payload validation failures.
    #[must_use]
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedInput {
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ReportError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let errors: Vec<ReportError> = vec![
            ReportError::InvalidConfig {
                details: String::new(),
            },
            ReportError::MissingConfig {
                path: PathBuf::new(),
            },
            ReportError::ConfigParse {
                context: "",
                details: String::new(),
            },
            ReportError::malformed(""),
            ReportError::InvalidPeriod {
                details: String::new(),
            },
            ReportError::missing_element(""),
            ReportError::DependencyNotReady {
                dependency: "",
                attempts: 0,
            },
            ReportError::Serialization {
                context: "",
                details: String::new(),
            },
            ReportError::io("", std::io::Error::other("test")),
        ];

        let codes: Vec<&str> = errors.iter().map(ReportError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn display_carries_code_prefix() {
        let err = ReportError::missing_element("reportChart");
        let text = err.to_string();
        assert!(text.starts_with("[DLR-3001]"));
        assert!(text.contains("#reportChart"));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(
            ReportError::DependencyNotReady {
                dependency: "word cloud engine",
                attempts: 3,
            }
            .is_retryable()
        );
        assert!(!ReportError::malformed("length mismatch").is_retryable());
        assert!(!ReportError::missing_element("wordCloud").is_retryable());
    }

    #[test]
    fn serde_json_error_maps_to_serialization() {
        let err: ReportError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.code(), "DLR-3101");
    }
}
