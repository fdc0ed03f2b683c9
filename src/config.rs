//! Configuration file support for ledgerlens
//!
//! Reads from .ledgerlens/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Viewer server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Report display settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Settings for `ledgerlens serve`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind. Default: "127.0.0.1"
    #[serde(default = "default_host")]
    pub host: String,

    /// Default: 3030
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload in bytes; bigger bodies get a 413.
    /// Default: 10 MiB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

/// Fallback names used when a report has no usable company name
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReportConfig {
    /// Shown in the banner and used in download file names.
    /// Default: "Unknown"
    #[serde(default = "default_company")]
    pub default_company: String,

    /// Shown inside the standalone HTML report.
    /// Default: "Company"
    #[serde(default = "default_html_company")]
    pub html_company: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_company() -> String {
    "Unknown".to_string()
}

fn default_html_company() -> String {
    crate::report::DEFAULT_HTML_COMPANY.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_company: default_company(),
            html_company: default_html_company(),
        }
    }
}

impl Config {
    /// Load config from .ledgerlens/config.toml
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        let found = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_config_path(&dir));

        match found {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load a specific config file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read config");
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(".ledgerlens").join("config.toml"))
            .find(|path| path.exists())
    }
}
