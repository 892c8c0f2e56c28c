use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::history::{History, HistoryError, DEFAULT_HISTORY_LENGTH};

/// History settings, loadable from a TOML file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept behind the current snapshot
    pub history_length: usize,
    /// Text the session starts from
    pub initial: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_length: DEFAULT_HISTORY_LENGTH,
            initial: String::new(),
        }
    }
}

impl HistoryConfig {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: HistoryConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_length == 0 {
            return Err(ConfigError::Invalid(HistoryError::InvalidLength(0)));
        }
        Ok(())
    }

    /// Build a history seeded with `initial` using these settings
    pub fn build_history<T>(
        &self,
        initial: T,
        on_change: impl FnMut(&T) + 'static,
    ) -> Result<History<T>, ConfigError> {
        let history = History::builder(initial)
            .history_length(self.history_length)
            .on_change(on_change)
            .build()?;
        Ok(history)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Read(String),
    Parse(String),
    Invalid(HistoryError),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "failed to read config file: {}", msg),
            ConfigError::Parse(msg) => write!(f, "failed to parse config file: {}", msg),
            ConfigError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl From<HistoryError> for ConfigError {
    fn from(e: HistoryError) -> Self {
        ConfigError::Invalid(e)
    }
}
