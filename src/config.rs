use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";
pub const DEFAULT_API_URL: &str = "https://script.google.com/macros/s/AKfycbyLRxXHo2kWTYFGI47gCNI8EDkpmB6axFVeJKShtDYJm5fC28CPDwaTna0S_gA9Srk/exec";
pub const API_URL_ENV: &str = "CHAT_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_message_count")]
    pub message_count: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Tên người dùng gửi thành công gần nhất
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_message_count() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_secs: default_poll_interval_secs(),
            message_count: default_message_count(),
            request_timeout_secs: default_request_timeout_secs(),
            username: None,
        }
    }
}

impl AppConfig {
    /// Ghi đè từ biến môi trường (đã nạp `.env` qua dotenvy).
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                log::info!("Using API URL from {API_URL_ENV}");
                self.api_url = url.to_string();
            }
        }
    }
}

/// `Ok(None)` khi file chưa tồn tại.
fn read_config(path: &Path) -> Result<Option<AppConfig>, serde_json::Error> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map(Some),
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            Ok(None)
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match read_config(path) {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            log::warn!("Failed to parse config file {}: {err}", path.display());
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

pub fn persist_username(path: &str, username: &str) {
    // Không ghi đè file cấu hình hỏng
    let mut config = match read_config(Path::new(path)) {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            log::warn!("Not saving username: config file {path} is malformed ({err})");
            return;
        }
    };
    if config.username.as_deref() == Some(username) {
        return;
    }
    config.username = Some(username.to_string());

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write config {}: {err}", path);
    } else {
        log::info!("Persisted username {} to {}", username, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&temp_path(&dir, "absent.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.message_count, 50);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "partial.json");
        fs::write(&path, r#"{"api_url":"http://localhost:9000/exec"}"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.api_url, "http://localhost:9000/exec");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.username, None);
    }

    #[test]
    fn persist_username_creates_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "nested/chat.json");

        persist_username(&path, "bob");
        assert_eq!(load_config(&path).username.as_deref(), Some("bob"));

        persist_username(&path, "alice");
        assert_eq!(load_config(&path).username.as_deref(), Some("alice"));
    }

    #[test]
    fn persist_username_leaves_malformed_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "broken.json");
        fs::write(&path, "{ \"api_url\": ").unwrap();

        persist_username(&path, "bob");
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ \"api_url\": ");
    }

    #[test]
    fn persist_username_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "chat.json");
        fs::write(&path, r#"{"api_url":"http://localhost:9000/exec","poll_interval_secs":3}"#)
            .unwrap();

        persist_username(&path, "bob");
        let config = load_config(&path);
        assert_eq!(config.api_url, "http://localhost:9000/exec");
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.username.as_deref(), Some("bob"));
    }
}
