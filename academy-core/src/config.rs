//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/parent-academy/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/parent-academy/` (~/.config/parent-academy/)
//! - State/Logs: `$XDG_STATE_HOME/parent-academy/` (~/.local/state/parent-academy/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Optional external workflow engine configuration
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External workflow engine configuration
///
/// When enabled, generation requests are first offered to the configured
/// engine endpoint; any failure falls back to the local deterministic
/// generators, so the core never depends on this being reachable.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowConfig {
    /// Enable/disable the external engine
    #[serde(default)]
    pub enabled: bool,

    /// Engine base URL (e.g., `https://workflows.example.com`)
    pub endpoint: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_workflow_timeout")]
    pub timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_secs: default_workflow_timeout(),
        }
    }
}

impl WorkflowConfig {
    /// Check if the engine is properly configured and enabled
    pub fn is_ready(&self) -> bool {
        self.enabled && self.endpoint.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.endpoint.is_none() {
            return Err(Error::Config(
                "workflow.endpoint is required when the workflow engine is enabled".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "workflow.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_workflow_timeout() -> u64 {
    10
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/parent-academy/config.toml` (~/.config/parent-academy/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("parent-academy").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/parent-academy/` (~/.local/state/parent-academy/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("parent-academy")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/parent-academy/parent-academy.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("parent-academy.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.workflow.enabled);
        assert!(config.workflow.endpoint.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[workflow]
enabled = true
endpoint = "https://workflows.example.com"
timeout_secs = 5

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.workflow.enabled);
        assert_eq!(
            config.workflow.endpoint.as_deref(),
            Some("https://workflows.example.com")
        );
        assert_eq!(config.workflow.timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
        assert!(config.workflow.is_ready());
    }

    #[test]
    fn test_workflow_config_validation() {
        // Disabled config is always valid
        let config = WorkflowConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_ready());

        // Enabled without an endpoint should fail
        let config = WorkflowConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Enabled with an endpoint should pass
        let config = WorkflowConfig {
            enabled: true,
            endpoint: Some("https://workflows.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.is_ready());
    }

    #[test]
    fn test_load_from_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.workflow.enabled);
    }
}
