//! Trampoline configuration.
//!
//! Configuration is an explicit value handed to [`Lambdak::run_with`]; nothing
//! is read from shared state while a chain runs. It can be loaded from a
//! TOML file:
//!
//! ```toml
//! [trampoline]
//! step_limit = 1000000
//! progress_interval = 10000
//! ```
//!
//! and then adjusted from the environment (`LAMBDAK_STEP_LIMIT`,
//! `LAMBDAK_PROGRESS_INTERVAL`).
//!
//! [`Lambdak::run_with`]: super::Lambdak::run_with

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding `step_limit` (`0` or `none` removes the limit)
pub const STEP_LIMIT_ENV: &str = "LAMBDAK_STEP_LIMIT";

/// Environment variable overriding `progress_interval`
pub const PROGRESS_INTERVAL_ENV: &str = "LAMBDAK_PROGRESS_INTERVAL";

/// Limits and diagnostics for one trampoline invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrampolineConfig {
    /// Maximum number of steps before the run fails with
    /// `EvalError::StepLimitExceeded`. `None` means unlimited.
    pub step_limit: Option<u64>,

    /// Emit a `debug!` progress event every this many steps.
    pub progress_interval: Option<u64>,
}

/// Top-level layout of a config file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    trampoline: TrampolineConfig,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File could not be read.
    Read(PathBuf, String),
    /// File contents were not valid TOML for this schema.
    Parse(String),
    /// An environment override was not a number.
    InvalidValue { var: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(path, err) => {
                write!(f, "Failed to read '{}': {}", path.display(), err)
            }
            ConfigError::Parse(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidValue { var, value } => {
                write!(f, "{} must be a non-negative integer, got '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl TrampolineConfig {
    /// No step limit, no progress events
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Parse the `[trampoline]` table of a TOML document. A missing table
    /// yields the default configuration.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(file.trampoline)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        Self::from_toml_str(&source)
    }

    /// Apply `LAMBDAK_*` overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(STEP_LIMIT_ENV) {
            self.step_limit = parse_limit(STEP_LIMIT_ENV, &raw)?;
        }
        if let Some(raw) = lookup(PROGRESS_INTERVAL_ENV) {
            self.progress_interval = parse_limit(PROGRESS_INTERVAL_ENV, &raw)?;
        }
        Ok(self)
    }
}

/// `0`, `none` and the empty string all mean "unset"
fn parse_limit(var: &str, raw: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str() {
        let config = TrampolineConfig::from_toml_str(
            r#"
            [trampoline]
            step_limit = 500
            progress_interval = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.step_limit, Some(500));
        assert_eq!(config.progress_interval, Some(100));
    }

    #[test]
    fn test_missing_table_is_default() {
        let config = TrampolineConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrampolineConfig::unlimited());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TrampolineConfig::from_toml_str("[trampoline]\nstep_limt = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let config = TrampolineConfig::unlimited()
            .with_overrides_from(|var| match var {
                STEP_LIMIT_ENV => Some("42".to_string()),
                PROGRESS_INTERVAL_ENV => Some("none".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.step_limit, Some(42));
        assert_eq!(config.progress_interval, None);
    }

    #[test]
    fn test_zero_override_clears_limit() {
        let config = TrampolineConfig::unlimited()
            .with_step_limit(10)
            .with_overrides_from(|var| (var == STEP_LIMIT_ENV).then(|| "0".to_string()))
            .unwrap();
        assert_eq!(config.step_limit, None);
    }

    #[test]
    fn test_invalid_override() {
        let err = TrampolineConfig::unlimited()
            .with_overrides_from(|_| Some("lots".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: STEP_LIMIT_ENV.to_string(),
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = TrampolineConfig::from_path(Path::new("/nonexistent/lambdak.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_, _)));
    }
}
