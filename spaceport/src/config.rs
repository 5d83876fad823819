//! Configuration for spaceport
//!
//! Default config location: ~/.spaceport/config.toml
//!
//! Every value can be overridden on the command line; the file only saves
//! typing for instances that are migrated regularly.

use crate::error::{MigrateError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub instance: InstanceConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for one instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Skip TLS certificate verification (INSECURE - self-signed test clusters only)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExportConfig {
    /// Object types accepted by `--types` on top of the built-in list
    #[serde(default)]
    pub extra_types: Vec<String>,
    /// Ask the instance to include every object referenced by an exported object
    #[serde(default)]
    pub include_references_deep: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Default config directory (~/.spaceport)
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".spaceport"))
        .unwrap_or_else(|| PathBuf::from(".spaceport"))
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let home = || {
        dirs::home_dir().ok_or_else(|| MigrateError::Config("Cannot determine home directory".into()))
    };
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        Ok(home()?.join(rest))
    } else if s == "~" {
        home()
    } else {
        Ok(path.to_path_buf())
    }
}

impl Config {
    /// Load config from a file, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let path = expand_tilde(path)?;
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MigrateError::Config(format!("Invalid config file: {}", e)))
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MigrateError::Config(format!("Cannot serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Object types `--types` may name: the built-in list plus `export.extra_types`.
    pub fn known_types(&self) -> Vec<String> {
        let mut types: Vec<String> = crate::selector::KNOWN_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect();
        for extra in &self.export.extra_types {
            if !types.contains(extra) {
                types.push(extra.clone());
            }
        }
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.instance.url.is_none());
        assert_eq!(config.instance.timeout_secs, 30);
        assert!(!config.instance.accept_invalid_certs);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let config = Config::load_or_default(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config.instance.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [instance]
            url = "https://kibana.staging:5601"

            [export]
            extra_types = ["canvas-workpad", "dashboard"]
            "#,
        )
        .unwrap();

        assert_eq!(config.instance.url.as_deref(), Some("https://kibana.staging:5601"));
        assert_eq!(config.instance.timeout_secs, 30);

        let known = config.known_types();
        assert!(known.contains(&"canvas-workpad".to_string()));
        assert_eq!(known.iter().filter(|t| *t == "dashboard").count(), 1);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let err = Config::from_toml("[instance]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/config.toml");

        let mut config = Config::default();
        config.instance.username = Some("elastic".into());
        config.logging.format = "json".into();
        config.save(&path).unwrap();

        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded.instance.username.as_deref(), Some("elastic"));
        assert_eq!(loaded.logging.format, "json");
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~/x.toml")).unwrap(), home.join("x.toml"));
        assert_eq!(expand_tilde(Path::new("/abs")).unwrap(), PathBuf::from("/abs"));
    }
}
