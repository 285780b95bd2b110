//! Runtime settings
//!
//! Loaded from `$INDICADORES_CONFIG` or `<config dir>/indicadores/config.toml`.
//! Every key is optional; a missing file means defaults. The source URLs can
//! also be overridden with `INDICADORES_BCB_URL` / `INDICADORES_YAHOO_URL`.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BCB_URL: &str = "https://api.bcb.gov.br";
pub const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; IndicadoresBot/1.0)";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub bcb_base_url: String,
    pub yahoo_base_url: String,
    pub user_agent: String,
    /// Per-request timeout; unset leaves the transport default
    pub timeout_secs: Option<u64>,
    /// Interactive prompt history; unset uses `~/.indicadores/.history`
    pub history_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bcb_base_url: DEFAULT_BCB_URL.to_string(),
            yahoo_base_url: DEFAULT_YAHOO_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            history_file: None,
        }
    }
}

impl Settings {
    /// Load settings from the default location plus environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("{}", e))
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("INDICADORES_BCB_URL").filter(|v| !v.trim().is_empty()) {
            self.bcb_base_url = url;
        }
        if let Some(url) = lookup("INDICADORES_YAHOO_URL").filter(|v| !v.trim().is_empty()) {
            self.yahoo_base_url = url;
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".indicadores").join(".history")
        })
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::var_os("INDICADORES_CONFIG")
        .map(PathBuf::from)
        .or_else(|| dir_spec::config_home().map(|dir| dir.join("indicadores").join("config.toml")))
}
