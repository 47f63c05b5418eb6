use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::SCRAPER_PATH;
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_CONFIG_FILE: &str = "trigger.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub server_url: String,
    pub endpoint_path: String,
    pub reset_delay_ms: u64,
    /// `0` disables the client-side timeout.
    pub request_timeout_ms: u64,
    pub allow_concurrent: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            endpoint_path: SCRAPER_PATH.into(),
            reset_delay_ms: 1500,
            request_timeout_ms: 30_000,
            allow_concurrent: true,
        }
    }
}

impl TriggerSettings {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    pub fn endpoint_url(&self) -> Result<Url, TransportError> {
        let base = Url::parse(self.server_url.trim())?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme '{}' in '{}'",
                base.scheme(),
                self.server_url
            )));
        }

        let path = self.endpoint_path.trim();
        let path = path.strip_prefix('/').unwrap_or(path);
        let base = base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

/// Reads `path` (or `trigger.toml` in the working directory when it exists),
/// then applies environment overrides.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<TriggerSettings> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            parse_settings(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?
        }
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(raw) => parse_settings(&raw)
                .with_context(|| format!("failed to parse {DEFAULT_CONFIG_FILE}"))?,
            Err(_) => TriggerSettings::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> anyhow::Result<TriggerSettings> {
    Ok(toml::from_str(raw)?)
}

/// `TRIGGER_*` keys win over their `APP__*` aliases.
pub fn apply_env_overrides<F>(settings: &mut TriggerSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        lookup(&format!("TRIGGER_{name}")).or_else(|| lookup(&format!("APP__{name}")))
    };

    if let Some(v) = get("SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = get("ENDPOINT_PATH") {
        settings.endpoint_path = v;
    }
    if let Some(v) = get("RESET_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.reset_delay_ms = parsed;
        }
    }
    if let Some(v) = get("REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_ms = parsed;
        }
    }
    if let Some(v) = get("ALLOW_CONCURRENT") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.allow_concurrent = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
