//! Runner configuration.
//!
//! Diagnostics are configured per graph or per runner; there is no
//! process-wide switch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid runner configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration injected into a graph or a single runner.
///
/// # Example
///
/// ```rust
/// use statewright::RunnerConfig;
///
/// let config = RunnerConfig::from_json(r#"{ "verbose": true }"#).unwrap();
/// assert!(config.verbose);
/// assert_eq!(config.history_limit, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Trace every accepted input and transition decision at `debug`.
    pub verbose: bool,

    /// Name prefix of the worker thread.
    pub worker_name: Option<String>,

    /// Number of transitions retained in the runner history. Zero disables
    /// recording.
    pub history_limit: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            worker_name: None,
            history_limit: 64,
        }
    }
}

impl RunnerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = Some(name.into());
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub(crate) fn thread_name(&self, runner: &uuid::Uuid) -> String {
        let prefix = self.worker_name.as_deref().unwrap_or("statewright");
        format!("{prefix}-{}", runner.simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet() {
        let config = RunnerConfig::default();
        assert!(!config.verbose);
        assert!(config.worker_name.is_none());
        assert_eq!(config.history_limit, 64);
    }

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(RunnerConfig::from_json("{}").unwrap(), RunnerConfig::default());
    }

    #[test]
    fn json_overrides_fields() {
        let config =
            RunnerConfig::from_json(r#"{"verbose": true, "worker_name": "parity", "history_limit": 0}"#)
                .unwrap();

        assert_eq!(
            config,
            RunnerConfig::default()
                .verbose(true)
                .worker_name("parity")
                .history_limit(0)
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = RunnerConfig::from_json(r#"{"verbose": "yes"}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid runner configuration"));
    }

    #[test]
    fn thread_name_uses_prefix() {
        let id = uuid::Uuid::nil();
        let name = RunnerConfig::default().worker_name("parity").thread_name(&id);
        assert_eq!(name, format!("parity-{}", id.simple()));
    }
}
