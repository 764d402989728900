//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::fallback::FallbackPolicy;

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pulse configuration with layered hierarchy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend API (all domain paths hang off it)
    pub api_url: Option<String>,

    /// Bearer token issued by the auth service
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Substitute demo data when list/dashboard fetches fail
    pub demo_fallback: Option<bool>,

    /// Default output format
    pub default_format: Option<String>,

    /// Where exported PDF/Excel files are saved
    pub download_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config (~/.config/pulse/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_from_path(&global_path) {
                config.merge(global);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Load a single config file, ignoring missing or malformed files
    pub fn load_from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str(&contents).ok()
    }

    /// Build the environment layer from a variable lookup
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            api_url: lookup("PULSE_API_URL"),
            token: lookup("PULSE_TOKEN"),
            timeout_secs: lookup("PULSE_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()),
            demo_fallback: lookup("PULSE_DEMO_FALLBACK").map(|v| parse_flag(&v)),
            default_format: lookup("PULSE_FORMAT"),
            download_dir: lookup("PULSE_DOWNLOAD_DIR").map(PathBuf::from),
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pulse")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.demo_fallback.is_some() {
            self.demo_fallback = other.demo_fallback;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.download_dir.is_some() {
            self.download_dir = other.download_dir;
        }
    }

    /// Get the API base URL
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Demo fallback is opt-in
    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.demo_fallback.unwrap_or(false) {
            FallbackPolicy::DemoData
        } else {
            FallbackPolicy::Disabled
        }
    }

    /// Get the download directory, defaulting to the working directory
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Token with all but the last four characters hidden
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            let visible: String = token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{}", visible)
        })
    }
}

/// Interpret "1", "true", "yes", "on" (any case) as enabled
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.fallback_policy(), FallbackPolicy::Disabled);
        assert_eq!(config.download_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_load_from_path() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(
            &path,
            "api_url: https://pulse.example.com/api\ndemo_fallback: true\ntimeout_secs: 5\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api_url(), "https://pulse.example.com/api");
        assert_eq!(config.fallback_policy(), FallbackPolicy::DemoData);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_file_is_none() {
        let tmp = tempdir().unwrap();
        assert!(Config::load_from_path(&tmp.path().join("absent.yaml")).is_none());
    }

    #[test]
    fn test_env_layer_overrides_file() {
        let mut config = Config {
            api_url: Some("https://file.example.com".to_string()),
            token: Some("file-token".to_string()),
            ..Default::default()
        };

        let env: HashMap<&str, &str> = [
            ("PULSE_API_URL", "https://env.example.com"),
            ("PULSE_DEMO_FALLBACK", "Yes"),
        ]
        .into_iter()
        .collect();
        config.merge(Config::from_env(|k| env.get(k).map(|v| v.to_string())));

        assert_eq!(config.api_url(), "https://env.example.com");
        assert_eq!(config.token.as_deref(), Some("file-token"));
        assert_eq!(config.fallback_policy(), FallbackPolicy::DemoData);
    }

    #[test]
    fn test_masked_token() {
        let config = Config {
            token: Some("abcdef123456".to_string()),
            ..Default::default()
        };
        assert_eq!(config.masked_token().as_deref(), Some("****3456"));
        assert_eq!(Config::default().masked_token(), None);
    }
}
