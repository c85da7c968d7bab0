//! Workspace management for appctl
//!
//! This module handles:
//! - Workspace detection and initialization
//! - Workspace locking for concurrent access
//! - The YAML-backed site, entity and metadata stores
//!
//! ## Workspace Structure
//!
//! ```text
//! .appctl/
//! ├── config.yaml        # Workspace configuration layer
//! ├── sites.yaml         # Registered sites
//! ├── applications.yaml  # Installed application entities
//! ├── metadata.yaml      # Streams registered by installed applications
//! ├── providers/         # Application provider descriptors (*.yaml)
//! ├── streams/           # Topics of the `file` stream provider
//! └── .lock              # Advisory lock file
//! ```

pub mod store;

use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;
use tracing::debug;

use crate::error::{Result, store as store_error};

pub use crate::config::loader::CONFIG_FILE;
pub use store::{YamlEntityStore, YamlMetadataStore, YamlSiteStore};

/// appctl workspace directory name
pub const WORKSPACE_DIR: &str = ".appctl";

pub const SITES_FILE: &str = "sites.yaml";

pub const APPLICATIONS_FILE: &str = "applications.yaml";

pub const METADATA_FILE: &str = "metadata.yaml";

/// Provider descriptors subdirectory
pub const PROVIDERS_DIR: &str = "providers";

/// Lock file for workspace locking
pub const LOCK_FILE: &str = ".lock";

/// Configuration written by `appctl init`
const INITIAL_CONFIG: &str = "\
application:
  stream:
    provider: file
metadata:
  provider: yaml
";

/// Represents an appctl workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (where .appctl is located)
    pub root: PathBuf,

    /// Path to the .appctl directory
    pub appctl_dir: PathBuf,
}

/// RAII guard for workspace locking
///
/// Acquires an advisory file lock on creation and releases it on drop.
/// The lock file itself is left in place so every process locks the same inode.
#[derive(Debug)]
pub struct WorkspaceGuard {
    lock: LockFile,
}

impl Workspace {
    /// Detect if a workspace exists at the given path
    pub fn exists(root: &Path) -> bool {
        root.join(WORKSPACE_DIR).is_dir()
    }

    /// Find a workspace by searching upward from the given path
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if Self::exists(&current) {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Open an existing workspace
    pub fn open(root: &Path) -> Result<Self> {
        let appctl_dir = root.join(WORKSPACE_DIR);

        if !appctl_dir.is_dir() {
            return Err(store_error::workspace_not_found(root.display().to_string()));
        }

        Ok(Self {
            root: root.to_path_buf(),
            appctl_dir,
        })
    }

    /// Initialize a new workspace at the given path
    ///
    /// Existing files are left untouched, so running this twice is harmless.
    pub fn init(root: &Path) -> Result<Self> {
        let appctl_dir = root.join(WORKSPACE_DIR);
        fs::create_dir_all(appctl_dir.join(PROVIDERS_DIR))?;

        write_if_missing(&appctl_dir.join(".gitignore"), ".lock\n*.tmp\nstreams/\n")?;
        write_if_missing(&appctl_dir.join(CONFIG_FILE), INITIAL_CONFIG)?;

        debug!(path = %appctl_dir.display(), "initialized workspace");

        Ok(Self {
            root: root.to_path_buf(),
            appctl_dir,
        })
    }

    pub fn config_path(&self) -> PathBuf {
        self.appctl_dir.join(CONFIG_FILE)
    }

    pub fn sites_path(&self) -> PathBuf {
        self.appctl_dir.join(SITES_FILE)
    }

    pub fn applications_path(&self) -> PathBuf {
        self.appctl_dir.join(APPLICATIONS_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.appctl_dir.join(METADATA_FILE)
    }

    pub fn providers_dir(&self) -> PathBuf {
        self.appctl_dir.join(PROVIDERS_DIR)
    }

    pub fn site_store(&self) -> YamlSiteStore {
        YamlSiteStore::new(self.sites_path())
    }

    pub fn entity_store(&self) -> YamlEntityStore {
        YamlEntityStore::new(self.applications_path())
    }

    /// Acquire a lock on this workspace
    pub fn lock(&self) -> Result<WorkspaceGuard> {
        WorkspaceGuard::acquire(&self.appctl_dir)
    }
}

impl WorkspaceGuard {
    /// Acquire the lock file in `dir`, blocking until it is free
    pub fn acquire(dir: &Path) -> Result<Self> {
        let lock_path = dir.join(LOCK_FILE);

        if !dir.is_dir() {
            return Err(store_error::workspace_not_found(dir.display().to_string()));
        }

        let mut lock = LockFile::open(&lock_path).map_err(|e| {
            store_error::locked(
                lock_path.display().to_string(),
                format!("Failed to open lock file: {}", e),
            )
        })?;

        lock.lock()
            .map_err(|e| store_error::locked(lock_path.display().to_string(), e.to_string()))?;

        Ok(Self { lock })
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content)
        .map_err(|e| store_error::write_failed(path.display().to_string(), e.to_string()))
}
