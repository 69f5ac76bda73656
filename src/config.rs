// ⚙️ Configuration - where the layout, labels and database live
// Read from the environment, falling back to working-directory defaults

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_LAYOUT_FILE: &str = "tabs.json";
pub const DEFAULT_LABELS_FILE: &str = "statistics.json";
pub const DEFAULT_DB_PATH: &str = "stats.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding tabs.json and the optional label overrides
    pub config_dir: PathBuf,
    pub layout_file: String,
    pub labels_file: String,
    pub db_path: PathBuf,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            layout_file: DEFAULT_LAYOUT_FILE.to_string(),
            labels_file: DEFAULT_LABELS_FILE.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// Build from `STATS_*` environment variables
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key source; unset or blank keys use defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        AppConfig {
            config_dir: get("STATS_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_dir),
            layout_file: get("STATS_LAYOUT_FILE").unwrap_or(defaults.layout_file),
            labels_file: get("STATS_LABELS_FILE").unwrap_or(defaults.labels_file),
            db_path: get("STATS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            bind_addr: get("STATS_BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }

    pub fn labels_path(&self) -> PathBuf {
        self.config_dir.join(&self.labels_file)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.labels_path(), PathBuf::from("config/statistics.json"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STATS_CONFIG_DIR", "/etc/stats"),
            ("STATS_DB_PATH", "/var/lib/stats.db"),
            ("STATS_BIND_ADDR", "127.0.0.1:8080"),
            ("STATS_LAYOUT_FILE", "  "),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.config_dir, PathBuf::from("/etc/stats"));
        assert_eq!(config.db_path(), Path::new("/var/lib/stats.db"));
        assert_eq!(config.layout_file, DEFAULT_LAYOUT_FILE);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_bad_bind_addr() {
        let config = AppConfig {
            bind_addr: "not-an-addr".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
