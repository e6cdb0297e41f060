//! Process configuration persisted in `<root>/config.json`.

use crate::storage::write_atomic;
use fastlog_core::{IntervalConfig, DEFAULT_EAT_HOURS, DEFAULT_FAST_HOURS};
use std::path::Path;

pub const FAST_HOURS: &str = "fast_hours";
pub const EAT_HOURS: &str = "eat_hours";

/// Keys accepted by [`set_value`].
pub const CONFIG_KEYS: &[&str] = &[FAST_HOURS, EAT_HOURS];

pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Read config. Returns empty map if file doesn't exist.
pub fn read_config(path: &Path) -> anyhow::Result<ConfigMap> {
    if !path.exists() {
        return Ok(ConfigMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    let val: serde_json::Value = serde_json::from_str(&content)?;
    match val {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(ConfigMap::new()),
    }
}

pub fn write_config(path: &Path, config: &ConfigMap) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())?;
    Ok(())
}

fn hours_value(key: &str, raw: &str) -> anyhow::Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| anyhow::anyhow!("{key} must be a whole number of hours, got {raw:?}"))
}

/// Validate and store one key. Unknown keys are rejected.
pub fn set_value(config: &mut ConfigMap, key: &str, raw: &str) -> anyhow::Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        anyhow::bail!(
            "unknown config key {key:?} (expected one of: {})",
            CONFIG_KEYS.join(", ")
        );
    }
    let hours = hours_value(key, raw)?;
    let mut candidate = config.clone();
    candidate.insert(key.to_string(), serde_json::Value::from(hours));
    // Reject combinations that cannot form an interval.
    interval_from_map(&candidate)?;
    *config = candidate;
    Ok(())
}

fn hours_in(config: &ConfigMap, key: &str, default: u32) -> anyhow::Result<u32> {
    match config.get(key) {
        None | Some(serde_json::Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| anyhow::anyhow!("config {key} is not a whole number of hours: {v}")),
    }
}

/// Build the interval from a config map, falling back to 16/8.
pub fn interval_from_map(config: &ConfigMap) -> anyhow::Result<IntervalConfig> {
    let fast = hours_in(config, FAST_HOURS, DEFAULT_FAST_HOURS)?;
    let eat = hours_in(config, EAT_HOURS, DEFAULT_EAT_HOURS)?;
    Ok(IntervalConfig::from_hours(fast, eat)?)
}

/// Resolve the interval: explicit overrides win over the config file.
pub fn interval_config(
    path: &Path,
    fast_override: Option<u32>,
    eat_override: Option<u32>,
) -> anyhow::Result<IntervalConfig> {
    let mut config = read_config(path)?;
    if let Some(h) = fast_override {
        config.insert(FAST_HOURS.to_string(), h.into());
    }
    if let Some(h) = eat_override {
        config.insert(EAT_HOURS.to_string(), h.into());
    }
    interval_from_map(&config)
}
