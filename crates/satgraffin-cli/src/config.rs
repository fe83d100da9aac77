//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Fallback backend endpoint for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for satgraffin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    pub base_url: Option<String>,
    /// Stable user id sent with each query
    pub user_id: Option<String>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("satgraffin")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for SATGRAFFIN_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("SATGRAFFIN_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            user_id: None,
            tui: Some(true),
        };

        default_config.save()?;
        Ok(path)
    }

    /// Resolve the backend base URL. Precedence: CLI flag, environment,
    /// config file, local development default.
    pub fn resolve_base_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.map(str::to_owned)
            .or_else(|| env.map(str::to_owned))
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# satgraffin configuration file
# Place at ~/.config/satgraffin/config.toml (Linux/Mac)
# or %APPDATA%\satgraffin\config.toml (Windows)

# Backend base URL (also settable via SATGRAFFIN_API_BASE_URL)
base_url = "http://localhost:8000"

# Stable user id sent with each query (default: random per run)
# user_id = "my-id"

# Whether to use TUI mode by default (true by default)
# Set to false for simple stdin/stdout mode
tui = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_precedence() {
        let cfg = Config {
            base_url: Some("http://from-config".into()),
            ..Default::default()
        };

        assert_eq!(
            cfg.resolve_base_url(Some("http://from-flag"), Some("http://from-env")),
            "http://from-flag"
        );
        assert_eq!(
            cfg.resolve_base_url(None, Some("http://from-env")),
            "http://from-env"
        );
        assert_eq!(cfg.resolve_base_url(None, None), "http://from-config");
        assert_eq!(
            Config::default().resolve_base_url(None, None),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let cfg: Config = toml::from_str("base_url = \"http://x\"\nextra = 1\n").unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://x"));
    }
}
