//! Resolution of an application's configuration at install time
//!
//! Defaults come from the descriptor in declaration order; caller overrides
//! are applied afterwards, so the last write wins and override-only keys are
//! added. The result is persisted with the entity and never re-merged.

use crate::domain::{Configuration, Property};
use crate::error::{Result, lifecycle as lifecycle_error};

/// Merge descriptor defaults with caller overrides
pub fn resolve(defaults: &[Property], overrides: Option<&Configuration>) -> Configuration {
    let mut resolved: Configuration = defaults
        .iter()
        .map(|property| (property.name.clone(), property.value.clone()))
        .collect();

    if let Some(overrides) = overrides {
        resolved.extend(
            overrides
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    resolved
}

/// Parse a `key=value` override
///
/// The value is read as a YAML scalar, so `workers=2` yields a number and
/// `enabled=true` a boolean; anything unparsable is kept as a string.
pub fn parse_override(input: &str) -> Result<(String, serde_json::Value)> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| {
            lifecycle_error::invalid_argument(format!("expected KEY=VALUE, got '{input}'"))
        })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(lifecycle_error::invalid_argument(format!(
            "empty key in '{input}'"
        )));
    }

    let value = serde_yaml::from_str::<serde_json::Value>(raw)
        .ok()
        .filter(|value| !value.is_null() || raw.trim() == "null")
        .unwrap_or_else(|| serde_json::Value::String(raw.to_string()));

    Ok((key.to_string(), value))
}
