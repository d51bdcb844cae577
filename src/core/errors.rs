//! CLK-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ClockError>;

/// Top-level error type for classclock.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("[CLK-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CLK-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CLK-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CLK-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CLK-3001] terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },

    #[error("[CLK-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CLK-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl ClockError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "CLK-1001",
            Self::MissingConfig { .. } => "CLK-1002",
            Self::ConfigParse { .. } => "CLK-1003",
            Self::Serialization { .. } => "CLK-2101",
            Self::Terminal { .. } => "CLK-3001",
            Self::Io { .. } => "CLK-3002",
            Self::Runtime { .. } => "CLK-3900",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<std::io::Error> for ClockError {
    fn from(source: std::io::Error) -> Self {
        Self::Terminal { source }
    }
}

impl From<serde_json::Error> for ClockError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ClockError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ClockError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}
