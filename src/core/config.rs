//! Configuration: TOML file + CLI overrides + defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};

const CONFIG_FILE_NAME: &str = "sysdash.toml";
const MAX_COMMAND_TIMEOUT_SECS: u64 = 30;
const MAX_REFRESH_RATE_SECS: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Service unit names, probed in this order
    pub services: Vec<String>,
    /// Most recent error records fetched per log channel
    pub log_limit: usize,
    /// Seconds between refreshes
    pub refresh_rate: f64,
    /// Files read as middleware log channels
    pub middleware_logs: Vec<PathBuf>,
    /// Time bound for every external command
    pub command_timeout_secs: u64,
    /// Where the dashboard writes its own log
    pub log_file: PathBuf,
    pub themes: ThemesConfig,
    /// File this config was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Named style overrides per theme (e.g. `error = "bold red"`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemesConfig {
    pub dark: BTreeMap<String, String>,
    pub light: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services: vec![
                "ssh.service".to_string(),
                "cron.service".to_string(),
                "networking.service".to_string(),
            ],
            log_limit: 10,
            refresh_rate: 2.0,
            middleware_logs: vec![PathBuf::from("/var/log/middleware.log")],
            command_timeout_secs: 5,
            log_file: PathBuf::from("sysdash.log"),
            themes: ThemesConfig::default(),
            source: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `./sysdash.toml` and then
    /// `<config dir>/sysdash/config.toml` are tried before falling back to
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(DashError::MissingConfig {
                        path: explicit.to_path_buf(),
                    });
                }
                Some(explicit.to_path_buf())
            }
            None => Self::default_paths().into_iter().find(|p| p.exists()),
        };

        let config = match resolved {
            Some(path) => Self::from_file(&path)?,
            None => {
                log::info!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut config = Self::from_toml(&raw)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sysdash").join("config.toml"));
        }
        paths
    }

    /// Reject values the dashboard cannot run with
    pub fn validate(&self) -> Result<()> {
        let representable = Duration::try_from_secs_f64(self.refresh_rate).is_ok();
        if !representable || self.refresh_rate <= 0.0 || self.refresh_rate > MAX_REFRESH_RATE_SECS {
            return Err(DashError::config(format!(
                "refresh_rate must be between 0 and {} seconds, got {}",
                MAX_REFRESH_RATE_SECS, self.refresh_rate
            )));
        }
        if self.log_limit == 0 {
            return Err(DashError::config("log_limit must be at least 1"));
        }
        if self.command_timeout_secs == 0 || self.command_timeout_secs > MAX_COMMAND_TIMEOUT_SECS {
            return Err(DashError::config(format!(
                "command_timeout_secs must be between 1 and {}, got {}",
                MAX_COMMAND_TIMEOUT_SECS, self.command_timeout_secs
            )));
        }
        if let Some(blank) = self.services.iter().position(|s| s.trim().is_empty()) {
            return Err(DashError::config(format!(
                "services[{}] is an empty service name",
                blank
            )));
        }
        Ok(())
    }

    /// Apply command line overrides, re-validating the result
    pub fn with_overrides(mut self, refresh_rate: Option<f64>, log_limit: Option<usize>) -> Result<Self> {
        if let Some(rate) = refresh_rate {
            self.refresh_rate = rate;
        }
        if let Some(limit) = log_limit {
            self.log_limit = limit;
        }
        self.validate()?;
        Ok(self)
    }

    /// Falls back to the default rate for values `validate` would reject
    pub fn refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.refresh_rate)
            .ok()
            .filter(|interval| !interval.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(Self::default().refresh_rate))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
