use thiserror::Error;

/// Rejected configuration, raised before any renderer state is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures at the signal-graph boundary. These never escape the analyzer.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The platform cannot build a signal-processing graph at all.
    #[error("signal graph unavailable: {0}")]
    Unsupported(String),
    /// The platform refused to start audio, usually pending a user gesture.
    #[error("signal graph rejected: {0}")]
    Rejected(String),
}
