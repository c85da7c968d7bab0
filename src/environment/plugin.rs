//! Plugin registry
//!
//! This module provides:
//! - Plugin registration by identifier
//! - Capability checks before a plugin is instantiated
//! - Default plugin definitions
//!
//! Plugins are plain constructor functions registered at startup; there is no
//! runtime discovery. An identifier that is not registered fails fast.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::stream::{FileStreamProvider, MemoryStreamProvider, StreamProvider};
use crate::config::{Config, WORKSPACE_DIR_KEY};
use crate::error::{AppError, Result, config as config_error, plugin as plugin_error};
use crate::store::{MemoryMetadataStore, MetadataStore};
use crate::workspace::YamlMetadataStore;

/// Key overriding where the `yaml` metadata store keeps its document
pub const METADATA_PATH_KEY: &str = "metadata.path";

/// Constructor of a stream provider plugin
pub type StreamFactory = fn(&Config) -> Result<Arc<dyn StreamProvider>>;

/// Constructor of a metadata store plugin
pub type MetadataFactory = fn(&Config) -> Result<Arc<dyn MetadataStore>>;

/// What a plugin provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    StreamProvider,
    MetadataStore,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamProvider => f.write_str("stream provider"),
            Self::MetadataStore => f.write_str("metadata store"),
        }
    }
}

/// A registered plugin constructor, tagged with its capability
#[derive(Clone, Copy)]
pub enum PluginFactory {
    Stream(StreamFactory),
    Metadata(MetadataFactory),
}

impl PluginFactory {
    pub fn capability(&self) -> Capability {
        match self {
            Self::Stream(_) => Capability::StreamProvider,
            Self::Metadata(_) => Capability::MetadataStore,
        }
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginFactory({})", self.capability())
    }
}

/// Registry of all available plugins
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    plugins: Vec<(String, PluginFactory)>,
    by_id: HashMap<String, usize>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Create a registry with the built-in plugins
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (id, factory) in builtin_plugins() {
            registry.register(id, factory);
        }
        registry
    }

    /// Register a plugin, replacing any plugin with the same identifier
    pub fn register(&mut self, id: impl Into<String>, factory: PluginFactory) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.by_id.get(&id) {
            self.plugins[idx].1 = factory;
        } else {
            self.by_id.insert(id.clone(), self.plugins.len());
            self.plugins.push((id, factory));
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&PluginFactory> {
        self.by_id
            .get(id)
            .and_then(|&idx| self.plugins.get(idx))
            .map(|(_, factory)| factory)
    }

    /// Identifiers of every plugin providing `capability`, in registration order
    pub fn ids_for(&self, capability: Capability) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, factory)| factory.capability() == capability)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Resolve, check and instantiate a stream provider
    pub fn load_stream_provider(
        &self,
        id: &str,
        config: &Config,
    ) -> Result<Arc<dyn StreamProvider>> {
        match self.resolve(id, Capability::StreamProvider)? {
            PluginFactory::Stream(factory) => instantiate(id, || factory(config)),
            PluginFactory::Metadata(_) => Err(incompatible(id, Capability::StreamProvider)),
        }
    }

    /// Resolve, check and instantiate a metadata store
    pub fn load_metadata_store(
        &self,
        id: &str,
        config: &Config,
    ) -> Result<Arc<dyn MetadataStore>> {
        match self.resolve(id, Capability::MetadataStore)? {
            PluginFactory::Metadata(factory) => instantiate(id, || factory(config)),
            PluginFactory::Stream(_) => Err(incompatible(id, Capability::MetadataStore)),
        }
    }

    fn resolve(&self, id: &str, required: Capability) -> Result<PluginFactory> {
        let factory = *self.get(id).ok_or_else(|| plugin_error::not_found(id))?;

        if factory.capability() != required {
            return Err(incompatible(id, required));
        }
        Ok(factory)
    }
}

fn incompatible(id: &str, capability: Capability) -> AppError {
    plugin_error::incompatible(id, capability.to_string())
}

fn instantiate<T: ?Sized>(
    id: &str,
    construct: impl FnOnce() -> Result<Arc<T>>,
) -> Result<Arc<T>> {
    let instance = construct().map_err(|e| match e {
        AppError::PluginInitFailed { .. } => e,
        other => plugin_error::init_failed(id, other.to_string()),
    })?;
    debug!(plugin = id, "loaded plugin");
    Ok(instance)
}

/// Get default plugin definitions
pub fn builtin_plugins() -> Vec<(&'static str, PluginFactory)> {
    vec![
        ("memory", PluginFactory::Stream(memory_stream)),
        ("file", PluginFactory::Stream(file_stream)),
        ("memory-metadata", PluginFactory::Metadata(memory_metadata)),
        ("yaml", PluginFactory::Metadata(yaml_metadata)),
    ]
}

fn memory_stream(_config: &Config) -> Result<Arc<dyn StreamProvider>> {
    Ok(Arc::new(MemoryStreamProvider::new()))
}

fn file_stream(config: &Config) -> Result<Arc<dyn StreamProvider>> {
    Ok(Arc::new(FileStreamProvider::from_config(config)?))
}

fn memory_metadata(_config: &Config) -> Result<Arc<dyn MetadataStore>> {
    Ok(Arc::new(MemoryMetadataStore::new()))
}

fn yaml_metadata(config: &Config) -> Result<Arc<dyn MetadataStore>> {
    let path = match (config.get_str(METADATA_PATH_KEY), config.get_str(WORKSPACE_DIR_KEY)) {
        (Some(path), _) => Path::new(path).to_path_buf(),
        (None, Some(workspace)) => Path::new(workspace).join(crate::workspace::METADATA_FILE),
        (None, None) => {
            return Err(config_error::invalid(format!(
                "yaml metadata store needs '{METADATA_PATH_KEY}' or '{WORKSPACE_DIR_KEY}'"
            )));
        }
    };
    Ok(Arc::new(YamlMetadataStore::new(path)))
}
