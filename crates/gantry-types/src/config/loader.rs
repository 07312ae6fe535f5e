//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. `GANTRY_CONFIG` environment variable (path to a JSON file).
//! 2. `~/.gantry/config.json`
//! 3. If neither exists, defaults are used.
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserialization, so hand-written configs can use either style.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::Config;
use crate::error::{GantryError, Result};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GANTRY_CONFIG";

/// Discover the config file path.
///
/// `env_path` is the value of [`CONFIG_ENV_VAR`], passed in so callers
/// (and tests) control the environment lookup. Returns `None` when no
/// candidate exists.
pub fn discover_config_path(env_path: Option<String>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }

    let candidate = home_dir?.join(".gantry").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Load the configuration using the discovery chain.
///
/// A discovered path that does not exist falls back to defaults with a
/// warning; a file that exists but cannot be parsed is an error.
pub fn load_config() -> Result<Config> {
    let env_path = std::env::var(CONFIG_ENV_VAR).ok();
    let Some(path) = discover_config_path(env_path, dirs::home_dir()) else {
        tracing::info!("no config file found, using defaults");
        return Ok(Config::default());
    };

    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "config path does not exist, using defaults"
        );
        return Ok(Config::default());
    }

    load_config_file(&path)
}

/// Load and parse a specific config file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    tracing::debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&contents).map_err(|e| {
        GantryError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_value(normalize_keys(raw))?)
}

/// Convert camelCase object keys to snake_case, recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), normalize_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert one camelCase identifier to snake_case.
///
/// Runs of capitals are treated as a single acronym word, so
/// `"kbURLOverride"` becomes `"kb_url_override"`.
pub fn camel_to_snake(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let starts_word = match prev {
                None => false,
                Some('_') => false,
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                Some(_) => false,
            };
            if starts_word {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
