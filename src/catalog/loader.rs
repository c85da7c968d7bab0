//! Provider descriptor loading
//!
//! Descriptors live one per file under a providers directory (`*.yaml` or
//! `*.yml`). Files are read in path order; a later file declaring the same
//! type replaces the earlier one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{DescriptorProvider, DispatchApplication, ProviderCatalog};
use crate::config::Config;
use crate::domain::ApplicationDescriptor;
use crate::environment::EnvironmentCache;
use crate::error::{Result, config as config_error};

/// Catalog loader binding descriptors to environments
pub struct CatalogLoader {
    providers_dir: PathBuf,
    environments: Arc<EnvironmentCache>,
    config: Config,
}

impl CatalogLoader {
    pub fn new(
        providers_dir: impl Into<PathBuf>,
        environments: Arc<EnvironmentCache>,
        config: Config,
    ) -> Self {
        Self {
            providers_dir: providers_dir.into(),
            environments,
            config,
        }
    }

    /// Load every descriptor and bind it to the environment of its kind
    pub fn load(&self) -> Result<ProviderCatalog> {
        let mut catalog = ProviderCatalog::new();

        for descriptor in self.load_descriptors()? {
            if catalog.contains(&descriptor.app_type) {
                warn!(app_type = %descriptor.app_type, "duplicate provider descriptor, later file wins");
            }

            let environment = self
                .environments
                .get_or_create(descriptor.environment, &self.config)?;
            let application = Arc::new(DispatchApplication::new(environment));
            catalog.register(Arc::new(DescriptorProvider::new(descriptor, application)));
        }

        debug!(providers = catalog.len(), "loaded provider catalog");
        Ok(catalog)
    }

    /// Parse every descriptor file without binding environments
    pub fn load_descriptors(&self) -> Result<Vec<ApplicationDescriptor>> {
        if !self.providers_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&self.providers_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|path| is_descriptor_file(path))
            .collect();
        paths.sort();

        paths.iter().map(|path| parse_descriptor(path)).collect()
    }
}

fn is_descriptor_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn parse_descriptor(path: &Path) -> Result<ApplicationDescriptor> {
    let content = fs::read_to_string(path)
        .map_err(|e| config_error::read_failed(path.display().to_string(), e.to_string()))?;

    let descriptor: ApplicationDescriptor = serde_yaml::from_str(&content)
        .map_err(|e| config_error::parse_failed(path.display().to_string(), e.to_string()))?;

    if descriptor.app_type.trim().is_empty() {
        return Err(config_error::parse_failed(
            path.display().to_string(),
            "descriptor type must not be empty",
        ));
    }

    Ok(descriptor)
}
