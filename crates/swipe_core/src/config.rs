use std::{collections::HashMap, fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_TOTAL_ITEMS: usize = 10;
pub const SETTINGS_FILE: &str = "swipe.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub total_items: usize,
    pub cat_api_url: String,
    pub placeholder_url: String,
    pub fetch_timeout_secs: u64,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_items: DEFAULT_TOTAL_ITEMS,
            cat_api_url: "https://cataas.com".into(),
            placeholder_url: "https://placekitten.com".into(),
            fetch_timeout_secs: 10,
            image_width: 400,
            image_height: 500,
        }
    }
}

impl Settings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn cat_api_base(&self) -> &str {
        self.cat_api_url.trim_end_matches('/')
    }

    pub fn placeholder_base(&self) -> &str {
        self.placeholder_url.trim_end_matches('/')
    }
}

/// Defaults, then `swipe.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, env);

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!("ignoring malformed {SETTINGS_FILE}: {err}");
            return;
        }
    };

    for (key, value) in file_cfg {
        let value = match value {
            toml::Value::String(s) => s,
            other => other.to_string(),
        };
        apply_key(settings, &key, &value);
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    const KEYS: [(&str, &str); 7] = [
        ("TOTAL_ITEMS", "total_items"),
        ("APP__TOTAL_ITEMS", "total_items"),
        ("CAT_API_URL", "cat_api_url"),
        ("APP__CAT_API_URL", "cat_api_url"),
        ("PLACEHOLDER_URL", "placeholder_url"),
        ("APP__PLACEHOLDER_URL", "placeholder_url"),
        ("APP__FETCH_TIMEOUT_SECS", "fetch_timeout_secs"),
    ];

    for (var, key) in KEYS {
        if let Some(v) = env(var) {
            apply_key(settings, key, &v);
        }
    }
}

fn apply_key(settings: &mut Settings, key: &str, value: &str) {
    let value = value.trim();
    match key {
        "total_items" => match value.parse::<usize>() {
            Ok(parsed) => settings.total_items = parsed,
            Err(_) => warn!(key, value, "total_items must be a non-negative integer"),
        },
        "cat_api_url" if !value.is_empty() => settings.cat_api_url = value.to_string(),
        "placeholder_url" if !value.is_empty() => settings.placeholder_url = value.to_string(),
        "fetch_timeout_secs" => match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.fetch_timeout_secs = parsed,
            _ => warn!(key, value, "fetch_timeout_secs must be a positive integer"),
        },
        "image_width" => match value.parse::<u32>() {
            Ok(parsed) if parsed > 0 => settings.image_width = parsed,
            _ => warn!(key, value, "image_width must be a positive integer"),
        },
        "image_height" => match value.parse::<u32>() {
            Ok(parsed) if parsed > 0 => settings.image_height = parsed,
            _ => warn!(key, value, "image_height must be a positive integer"),
        },
        _ => warn!(key, "ignoring unknown or empty setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
