use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::common::constants::{
    DEFAULT_TIMEOUT_SECONDS, ENV_SCRIPT_URL, ENV_SHEET, SUBSCRIPTION_SHEET,
};
use crate::common::error::{Result, SyncError};
use crate::pipeline::processing::columns::ColumnMap;
use crate::pipeline::processing::normalize::NormalizeConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub normalize: NormalizeConfig,
    pub columns: ColumnMap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Sheet backend endpoint. Empty means not configured.
    pub script_url: String,
    pub sheet: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            script_url: String::new(),
            sheet: SUBSCRIPTION_SHEET.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The configured endpoint, or a config error if none is set.
    pub fn require_script_url(&self) -> Result<&str> {
        let url = self.script_url.trim();
        if url.is_empty() {
            return Err(SyncError::Config(format!(
                "script URL is not defined (set source.script_url or {ENV_SCRIPT_URL})"
            )));
        }
        Ok(url)
    }
}

impl Config {
    /// Load from a TOML file, then apply environment overrides.
    /// A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                SyncError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(&content)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment wins over the file for the endpoint and sheet name.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SCRIPT_URL).filter(|v| !v.trim().is_empty()) {
            self.source.script_url = url;
        }
        if let Some(sheet) = lookup(ENV_SHEET).filter(|v| !v.trim().is_empty()) {
            self.source.sheet = sheet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.sheet, "Subscription");
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.normalize.default_text, "N/A");
        assert_eq!(config.columns, ColumnMap::default());
        assert!(config.source.require_script_url().is_err());
    }

    #[test]
    fn test_parses_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [source]
            script_url = "https://script.example/exec"

            [normalize]
            utc_offset_minutes = 330

            [columns]
            actual3 = 19
            "#,
        )
        .unwrap();
        assert_eq!(config.source.require_script_url().unwrap(), "https://script.example/exec");
        assert_eq!(config.source.sheet, "Subscription");
        assert_eq!(config.normalize.utc_offset_minutes, 330);
        assert_eq!(config.normalize.default_text, "N/A");
        assert_eq!(config.columns.actual3, 19);
        assert_eq!(config.columns.actual2, 14);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[source]\ntimeout_seconds = \"soon\""),
            Err(SyncError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| match key {
            ENV_SCRIPT_URL => Some("https://env.example/exec".to_string()),
            ENV_SHEET => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.source.script_url, "https://env.example/exec");
        assert_eq!(config.source.sheet, "Subscription");
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nsheet = \"Archive\"\ntimeout_seconds = 5").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.columns, ColumnMap::default());
    }
}
