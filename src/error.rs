use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for the dashboard
#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration file not found: {}", path.display())]
    MissingConfig { path: PathBuf },

    #[error("Invalid style '{style}': {reason}")]
    Style { style: String, reason: String },

    #[error("Failed to run {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{what} timed out after {}s", after.as_secs_f64())]
    Timeout { what: String, after: Duration },

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),
}

/// Result type alias for the dashboard
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DashError::Config(msg.into())
    }

    /// Create a style error
    pub fn style<S: Into<String>, R: Into<String>>(style: S, reason: R) -> Self {
        DashError::Style {
            style: style.into(),
            reason: reason.into(),
        }
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        DashError::MetricCollection(msg.into())
    }

    /// True for the collaborator timeout class of failures
    pub fn is_timeout(&self) -> bool {
        matches!(self, DashError::Timeout { .. })
    }
}
