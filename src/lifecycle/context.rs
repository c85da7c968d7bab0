//! Per-invocation adapter between the controller and the execution backend
//!
//! An [`OperationContext`] binds one application capability to one entity,
//! its descriptor, the global configuration and the metadata store for the
//! duration of a single controller call. Hook failures are returned
//! unmodified.

use tracing::{debug, warn};

use crate::catalog::Application;
use crate::config::Config;
use crate::domain::{ApplicationDescriptor, ApplicationEntity, Status, StreamDefinition};
use crate::error::Result;
use crate::store::MetadataStore;

/// Runtime keys layered over the entity configuration
pub const SITE_ID_KEY: &str = "siteId";
pub const APP_ID_KEY: &str = "appId";
pub const MODE_KEY: &str = "mode";
pub const JAR_PATH_KEY: &str = "jarPath";

pub struct OperationContext<'a> {
    application: &'a dyn Application,
    entity: &'a ApplicationEntity,
    descriptor: &'a ApplicationDescriptor,
    config: &'a Config,
    metadata: &'a dyn MetadataStore,
}

impl<'a> OperationContext<'a> {
    pub fn new(
        application: &'a dyn Application,
        entity: &'a ApplicationEntity,
        descriptor: &'a ApplicationDescriptor,
        config: &'a Config,
        metadata: &'a dyn MetadataStore,
    ) -> Self {
        Self {
            application,
            entity,
            descriptor,
            config,
            metadata,
        }
    }

    pub fn entity(&self) -> &ApplicationEntity {
        self.entity
    }

    pub fn descriptor(&self) -> &ApplicationDescriptor {
        self.descriptor
    }

    pub fn global_config(&self) -> &Config {
        self.config
    }

    /// Global configuration overlaid with the entity configuration and the
    /// runtime keys. Computed on every call and never persisted.
    ///
    /// Entity keys are dotted paths applied in key order. When both `a` and
    /// `a.b` are present the scalar at `a` is replaced by a table holding `b`;
    /// this is logged.
    pub fn effective_config(&self) -> Config {
        let mut config = self.config.clone();
        for (key, value) in &self.entity.configuration {
            if let Some(prefix) = scalar_prefix(&config, key) {
                warn!(app_id = %self.entity.app_id, key = %key, replaced = prefix, "configuration key replaces a scalar value");
            }
            config.set(key, value.clone());
        }

        config.set(SITE_ID_KEY, self.entity.site_id.clone());
        config.set(APP_ID_KEY, self.entity.app_id.clone());
        config.set(MODE_KEY, self.entity.mode.to_string());
        if let Some(jar_path) = &self.entity.jar_path {
            config.set(JAR_PATH_KEY, jar_path.clone());
        }
        config
    }

    /// Site-scoped copies of the streams the descriptor declares
    pub fn scoped_streams(&self) -> Vec<StreamDefinition> {
        self.descriptor
            .streams
            .iter()
            .map(|stream| stream.scoped_to(&self.entity.site_id))
            .collect()
    }

    /// Run the install hook, then register the application's streams
    pub fn on_install(&self) -> Result<()> {
        self.application.on_install(self)?;

        let streams = self.scoped_streams();
        if !streams.is_empty() {
            self.metadata.register_streams(&self.entity.app_id, &streams)?;
            debug!(app_id = %self.entity.app_id, streams = streams.len(), "registered streams");
        }
        Ok(())
    }

    /// Run the uninstall hook, then drop the application's streams
    pub fn on_uninstall(&self) -> Result<()> {
        self.application.on_uninstall(self)?;

        let removed = self.metadata.remove_streams(&self.entity.app_id)?;
        if !removed.is_empty() {
            debug!(app_id = %self.entity.app_id, streams = removed.len(), "removed streams");
        }
        Ok(())
    }

    pub fn on_start(&self) -> Result<()> {
        self.application.on_start(self)
    }

    pub fn on_stop(&self) -> Result<()> {
        self.application.on_stop(self)
    }

    pub fn status(&self) -> Result<Status> {
        self.application.status(self)
    }
}

/// First proper prefix of `key` that holds a non-table value in `config`
fn scalar_prefix<'k>(config: &Config, key: &'k str) -> Option<&'k str> {
    key.match_indices('.')
        .map(|(idx, _)| &key[..idx])
        .find(|prefix| config.get(prefix).is_some_and(|value| !value.is_object()))
}
