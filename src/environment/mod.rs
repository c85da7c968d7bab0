//! Execution environments
//!
//! An [`Environment`] binds an [`EnvironmentKind`] to a configuration and to
//! the single stream provider loaded for it. The provider is resolved once,
//! when the environment is constructed, and reused for its whole lifetime;
//! a misconfigured provider fails construction rather than first use.
//!
//! Two environments are equal when their kind and configuration are equal,
//! which is what [`EnvironmentCache`] deduplicates on.

pub mod plugin;
pub mod stream;

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error};

use crate::config::Config;
use crate::error::{Result, config as config_error};

pub use crate::domain::EnvironmentKind;
pub use plugin::{Capability, PluginFactory, PluginRegistry};
pub use stream::{FileStreamProvider, MemoryStreamProvider, StreamProvider, StreamRecord};

/// Configuration key naming the stream provider plugin
pub const STREAM_PROVIDER_KEY: &str = "application.stream.provider";

/// Stream provider used when [`STREAM_PROVIDER_KEY`] is absent
pub const DEFAULT_STREAM_PROVIDER: &str = "memory";

pub struct Environment {
    kind: EnvironmentKind,
    config: Config,
    stream: Arc<dyn StreamProvider>,
}

impl Environment {
    /// Construct an environment, loading its stream provider from `registry`
    pub fn new(kind: EnvironmentKind, config: Config, registry: &PluginRegistry) -> Result<Self> {
        let provider_id = stream_provider_id(&config)?;
        let stream = registry
            .load_stream_provider(&provider_id, &config)
            .inspect_err(|e| error!(provider = %provider_id, error = %e, "failed to load stream provider"))?;

        debug!(kind = %kind, provider = %provider_id, "loaded {:?}", stream);

        Ok(Self {
            kind,
            config,
            stream,
        })
    }

    pub fn kind(&self) -> EnvironmentKind {
        self.kind
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stream(&self) -> &Arc<dyn StreamProvider> {
        &self.stream
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("kind", &self.kind)
            .field("stream", &self.stream.name())
            .field("config", &self.config.fingerprint())
            .finish()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.config == other.config
    }
}

impl Eq for Environment {}

impl Hash for Environment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.config.hash(state);
    }
}

/// Identifier of the configured stream provider, or the default one
pub fn stream_provider_id(config: &Config) -> Result<String> {
    match config.get(STREAM_PROVIDER_KEY) {
        None => Ok(DEFAULT_STREAM_PROVIDER.to_string()),
        Some(serde_json::Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        Some(other) => Err(config_error::invalid(format!(
            "'{STREAM_PROVIDER_KEY}' must be a plugin identifier, got {other}"
        ))),
    }
}

/// Environments deduplicated by kind and configuration
#[derive(Debug)]
pub struct EnvironmentCache {
    registry: Arc<PluginRegistry>,
    environments: Mutex<HashMap<(EnvironmentKind, Config), Arc<Environment>>>,
}

impl EnvironmentCache {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            environments: Mutex::new(HashMap::new()),
        }
    }

    /// Shared environment for `(kind, config)`, constructing it on first request
    pub fn get_or_create(&self, kind: EnvironmentKind, config: &Config) -> Result<Arc<Environment>> {
        let mut environments = self
            .environments
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let key = (kind, config.clone());
        if let Some(environment) = environments.get(&key) {
            return Ok(Arc::clone(environment));
        }

        let environment = Arc::new(Environment::new(kind, config.clone(), &self.registry)?);
        environments.insert(key, Arc::clone(&environment));
        Ok(environment)
    }

    pub fn len(&self) -> usize {
        self.environments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
