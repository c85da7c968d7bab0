//! Message-transport stream providers
//!
//! A stream provider is the transport lifecycle commands travel over. Records
//! are keyed, and a provider can answer with the latest record for a key on a
//! topic, the way a compacted topic would.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::{Config, WORKSPACE_DIR_KEY};
use crate::error::{Result, config as config_error, store as store_error};

/// Key overriding where the `file` provider keeps its topics
pub const STREAM_PATH_KEY: &str = "application.stream.path";

/// A keyed record on a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub key: String,
    pub payload: serde_json::Value,
}

impl StreamRecord {
    pub fn new(key: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }
}

/// Message transport capability
pub trait StreamProvider: Send + Sync + fmt::Debug {
    /// Identifier the provider was registered under
    fn name(&self) -> &str;

    fn publish(&self, topic: &str, record: StreamRecord) -> Result<()>;

    /// Latest record published on `topic` under `key`
    fn latest(&self, topic: &str, key: &str) -> Result<Option<StreamRecord>>;
}

/// Process-local transport
#[derive(Debug, Default)]
pub struct MemoryStreamProvider {
    topics: RwLock<HashMap<String, Vec<StreamRecord>>>,
}

impl MemoryStreamProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record published on `topic`, oldest first
    pub fn records(&self, topic: &str) -> Vec<StreamRecord> {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }
}

impl StreamProvider for MemoryStreamProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn publish(&self, topic: &str, record: StreamRecord) -> Result<()> {
        self.topics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn latest(&self, topic: &str, key: &str) -> Result<Option<StreamRecord>> {
        let topics = self.topics.read().unwrap_or_else(PoisonError::into_inner);
        Ok(topics
            .get(topic)
            .and_then(|records| records.iter().rev().find(|r| r.key == key))
            .cloned())
    }
}

/// Transport appending JSON lines to one file per topic
#[derive(Debug)]
pub struct FileStreamProvider {
    dir: PathBuf,
}

impl FileStreamProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build from `application.stream.path`, else `<workspace.dir>/streams`
    pub fn from_config(config: &Config) -> Result<Self> {
        let dir = match (config.get_str(STREAM_PATH_KEY), config.get_str(WORKSPACE_DIR_KEY)) {
            (Some(path), _) => PathBuf::from(path),
            (None, Some(workspace)) => Path::new(workspace).join("streams"),
            (None, None) => {
                return Err(config_error::invalid(format!(
                    "file stream provider needs '{STREAM_PATH_KEY}' or '{WORKSPACE_DIR_KEY}'"
                )));
            }
        };
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn topic_path(&self, topic: &str) -> PathBuf {
        let file_name: String = topic
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.jsonl"))
    }
}

impl StreamProvider for FileStreamProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn publish(&self, topic: &str, record: StreamRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.topic_path(topic);

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| store_error::write_failed(path.display().to_string(), e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| store_error::write_failed(path.display().to_string(), e.to_string()))
    }

    fn latest(&self, topic: &str, key: &str) -> Result<Option<StreamRecord>> {
        let path = self.topic_path(topic);
        if !path.exists() {
            return Ok(None);
        }

        let file = fs::File::open(&path)
            .map_err(|e| store_error::read_failed(path.display().to_string(), e.to_string()))?;

        let mut latest = None;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: StreamRecord =
                serde_json::from_str(&line).map_err(|e| {
                    store_error::read_failed(path.display().to_string(), e.to_string())
                })?;
            if record.key == key {
                latest = Some(record);
            }
        }
        Ok(latest)
    }
}
