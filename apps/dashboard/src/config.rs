use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::SessionOptions;
use serde::Deserialize;
use shared::domain::DEFAULT_PAGE_SIZE;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub page_size: u32,
    pub request_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_ms: 10_000,
        }
    }
}

impl Settings {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            page_size: self.page_size,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    fn set_page_size(&mut self, value: u32) {
        if value > 0 {
            self.page_size = value;
        }
    }

    fn set_request_timeout_ms(&mut self, value: u64) {
        if value > 0 {
            self.request_timeout_ms = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_ms: Option<u64>,
}

/// Defaults, then `path` (if present), then environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.set_page_size(v);
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        settings.set_request_timeout_ms(v);
    }
    Ok(())
}

pub(crate) fn apply_env<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("DASHBOARD_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        match v.trim().parse::<u32>() {
            Ok(parsed) => settings.set_page_size(parsed),
            Err(_) => warn!(value = %v, "config: ignoring invalid APP__PAGE_SIZE"),
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.set_request_timeout_ms(parsed),
            Err(_) => warn!(value = %v, "config: ignoring invalid APP__REQUEST_TIMEOUT_MS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
