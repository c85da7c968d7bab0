//! Application provider catalog
//!
//! This module provides:
//! - The [`Application`] capability an installed entity runs through
//! - [`ApplicationProvider`], pairing a descriptor with its application
//! - [`Catalog`], the lookup the lifecycle controller resolves types against
//! - [`ProviderCatalog`], a registry-backed catalog
//! - [`CatalogLoader`], which reads provider descriptors from a workspace

pub mod dispatch;
pub mod loader;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::{ApplicationDescriptor, Status};
use crate::error::{Result, lifecycle as lifecycle_error};
use crate::lifecycle::OperationContext;

pub use dispatch::{DispatchApplication, LifecycleCommand};
pub use loader::CatalogLoader;

/// Runtime capability of an application type
///
/// Every hook is a blocking call into the execution backend. The defaults do
/// nothing, which is what a library-only application wants.
pub trait Application: Send + Sync {
    fn is_executable(&self) -> bool;

    fn on_install(&self, _context: &OperationContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_uninstall(&self, _context: &OperationContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_start(&self, _context: &OperationContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_stop(&self, _context: &OperationContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Status as observed by the backend
    fn status(&self, context: &OperationContext<'_>) -> Result<Status>;
}

/// Maps an application type to its descriptor and runtime capability
pub trait ApplicationProvider: Send + Sync {
    fn descriptor(&self) -> &ApplicationDescriptor;

    fn application(&self) -> Arc<dyn Application>;
}

/// Application type lookup
pub trait Catalog: Send + Sync {
    fn descriptor_for_type(&self, app_type: &str) -> Option<&ApplicationDescriptor>;

    fn provider_for_type(&self, app_type: &str) -> Result<Arc<dyn ApplicationProvider>>;

    /// Every known descriptor, in registration order
    fn descriptors(&self) -> Vec<&ApplicationDescriptor>;
}

/// Provider built from a descriptor and an already-bound application
pub struct DescriptorProvider {
    descriptor: ApplicationDescriptor,
    application: Arc<dyn Application>,
}

impl DescriptorProvider {
    pub fn new(descriptor: ApplicationDescriptor, application: Arc<dyn Application>) -> Self {
        Self {
            descriptor,
            application,
        }
    }
}

impl ApplicationProvider for DescriptorProvider {
    fn descriptor(&self) -> &ApplicationDescriptor {
        &self.descriptor
    }

    fn application(&self) -> Arc<dyn Application> {
        Arc::clone(&self.application)
    }
}

/// Registry of application providers keyed by type
#[derive(Default)]
pub struct ProviderCatalog {
    providers: Vec<Arc<dyn ApplicationProvider>>,
    by_type: HashMap<String, usize>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any provider of the same type
    pub fn register(&mut self, provider: Arc<dyn ApplicationProvider>) -> &mut Self {
        let app_type = provider.descriptor().app_type.clone();
        if let Some(&idx) = self.by_type.get(&app_type) {
            self.providers[idx] = provider;
        } else {
            self.by_type.insert(app_type, self.providers.len());
            self.providers.push(provider);
        }
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn ApplicationProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn contains(&self, app_type: &str) -> bool {
        self.by_type.contains_key(app_type)
    }

    fn get(&self, app_type: &str) -> Option<&Arc<dyn ApplicationProvider>> {
        self.by_type
            .get(app_type)
            .and_then(|&idx| self.providers.get(idx))
    }
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| &p.descriptor().app_type))
            .finish()
    }
}

impl Catalog for ProviderCatalog {
    fn descriptor_for_type(&self, app_type: &str) -> Option<&ApplicationDescriptor> {
        self.get(app_type).map(|provider| provider.descriptor())
    }

    fn provider_for_type(&self, app_type: &str) -> Result<Arc<dyn ApplicationProvider>> {
        self.get(app_type)
            .cloned()
            .ok_or_else(|| lifecycle_error::descriptor_not_found(app_type))
    }

    fn descriptors(&self) -> Vec<&ApplicationDescriptor> {
        self.providers
            .iter()
            .map(|provider| provider.descriptor())
            .collect()
    }
}
