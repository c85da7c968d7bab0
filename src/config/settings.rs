//! Hierarchical configuration tree
//!
//! Keys are addressed by dotted paths (`application.stream.provider`).
//! Dotted keys written flat in YAML are expanded into nested tables when
//! loaded, so `a.b: 1` and `a: {b: 1}` describe the same tree.

use std::collections::BTreeMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result, config as config_error};
use crate::hash;

/// Hierarchical key/value configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Config {
    root: Map<String, Value>,
}

impl Eq for Config {}

impl Hash for Config {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a JSON value, which must be a table (or null)
    pub fn from_value(value: Value) -> Result<Self> {
        let mut config = Self::new();
        match value {
            Value::Null => {}
            Value::Object(entries) => {
                for (key, value) in entries {
                    config.insert_expanded(&key, value);
                }
            }
            other => {
                return Err(config_error::invalid(format!(
                    "configuration root must be a table, got {other}"
                )));
            }
        }
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error::read_failed(path.display().to_string(), e.to_string()))?;

        Self::from_yaml(&content).map_err(|e| match e {
            AppError::ConfigParseFailed { reason, .. } => {
                config_error::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// String value at `path`; `None` if absent or not a string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_str_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.get_str(path).unwrap_or(default)
    }

    /// Set a value at a dotted path, creating intermediate tables
    ///
    /// A non-table value sitting on the path is replaced by a table.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        self.insert_expanded(path, value.into());
    }

    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.set(path, value);
        self
    }

    /// Deep-merge `other` into this config; values from `other` win
    pub fn merge(&mut self, other: &Config) {
        merge_tables(&mut self.root, &other.root);
    }

    pub fn merged(mut self, other: &Config) -> Self {
        self.merge(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Leaf values keyed by their dotted path
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        let mut out = BTreeMap::new();
        flatten_into(&self.root, "", &mut out);
        out
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Stable content fingerprint; equal configs have equal fingerprints
    pub fn fingerprint(&self) -> String {
        // serde_json's default map is ordered, so serialization is canonical
        let bytes = serde_json::to_vec(&self.root).unwrap_or_default();
        hash::fingerprint(&bytes)
    }

    fn insert_expanded(&mut self, path: &str, value: Value) {
        let value = match value {
            Value::Object(entries) => {
                let mut nested = Config::new();
                for (key, value) in entries {
                    nested.insert_expanded(&key, value);
                }
                Value::Object(nested.root)
            }
            other => other,
        };

        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut table = &mut self.root;
        for segment in parents {
            let entry = table
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            table = next;
        }

        if let Value::Object(incoming) = &value {
            if let Some(Value::Object(existing)) = table.get_mut(*last) {
                merge_tables(existing, incoming);
                return;
            }
        }
        table.insert((*last).to_string(), value);
    }
}

fn merge_tables(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = base.get_mut(key) {
                merge_tables(existing, incoming);
                continue;
            }
        }
        base.insert(key.clone(), value.clone());
    }
}

fn flatten_into(table: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, Value>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(nested, &path, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}
