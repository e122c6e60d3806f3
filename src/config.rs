use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_feedback_flash_ms")]
    pub feedback_flash_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_progress_dir")]
    pub progress_dir: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cluegrid")
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_feedback_flash_ms() -> u64 {
    1500
}
fn default_theme() -> String {
    "ink".to_string()
}
fn default_progress_dir() -> String {
    data_dir().join("progress").to_string_lossy().to_string()
}
fn default_log_file() -> String {
    data_dir().join("cluegrid.log").to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
            feedback_flash_ms: default_feedback_flash_ms(),
            theme: default_theme(),
            progress_dir: default_progress_dir(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cluegrid")
            .join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn feedback_flash(&self) -> Duration {
        Duration::from_millis(self.feedback_flash_ms)
    }

    /// Reset values that would leave the app unusable.
    pub fn validate(&mut self, themes: &[String]) {
        if self.server_url.trim().is_empty() {
            self.server_url = default_server_url();
        }
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 120);
        self.feedback_flash_ms = self.feedback_flash_ms.clamp(200, 10_000);
        if !themes.iter().any(|t| *t == self.theme) {
            self.theme = default_theme();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.feedback_flash_ms, 1500);
        assert!(config.progress_dir.contains("progress"));
        assert!(config.log_file.ends_with("cluegrid.log"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
server_url = "https://clues.example.org"
theme = "paper"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server_url, "https://clues.example.org");
        assert_eq!(config.theme, "paper");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.server_url, deserialized.server_url);
        assert_eq!(config.progress_dir, deserialized.progress_dir);
        assert_eq!(config.feedback_flash(), deserialized.feedback_flash());
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.server_url = "  ".to_string();
        config.request_timeout_secs = 0;
        config.feedback_flash_ms = 5;
        config.theme = "neon".to_string();
        config.validate(&["ink".to_string(), "paper".to_string()]);
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.feedback_flash_ms, 200);
        assert_eq!(config.theme, "ink");
    }
}
