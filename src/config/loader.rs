//! Layered configuration loading
//!
//! Priority order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. Global `config.yaml` from `~/.config/appctl/` (if exists)
//! 3. Workspace `.appctl/config.yaml` (if exists)
//! 4. Runtime keys (`workspace.dir`)
//! 5. `APPCTL_STREAM_PROVIDER` environment variable

use std::path::{Path, PathBuf};

use tracing::debug;

use super::Config;
use crate::environment::STREAM_PROVIDER_KEY;
use crate::error::Result;

/// Config filename, both globally and inside a workspace
pub const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the stream provider identifier
pub const STREAM_PROVIDER_ENV: &str = "APPCTL_STREAM_PROVIDER";

/// Runtime key holding the workspace directory
pub const WORKSPACE_DIR_KEY: &str = "workspace.dir";

/// Topic lifecycle commands are published on
pub const COMMAND_TOPIC_KEY: &str = "application.commands.topic";

/// Configuration loader
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Directory holding the workspace `config.yaml`
    workspace_dir: Option<PathBuf>,

    /// Directory holding the global `config.yaml`; `None` uses the platform default
    global_dir: Option<PathBuf>,

    skip_global: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_dir = Some(dir.into());
        self
    }

    pub fn with_global_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_dir = Some(dir.into());
        self
    }

    /// Do not read any global configuration
    pub fn without_global(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Load and merge every configuration layer
    pub fn load(&self) -> Result<Config> {
        let mut config = builtin_defaults();

        if let Some(global) = self.load_global()? {
            config.merge(&global);
        }

        if let Some(dir) = &self.workspace_dir {
            if let Some(workspace) = load_optional(&dir.join(CONFIG_FILE))? {
                config.merge(&workspace);
            }
            config.set(WORKSPACE_DIR_KEY, dir.display().to_string());
        }

        if let Ok(provider) = std::env::var(STREAM_PROVIDER_ENV) {
            if !provider.trim().is_empty() {
                debug!(provider = %provider, "stream provider overridden from environment");
                config.set(STREAM_PROVIDER_KEY, provider.trim());
            }
        }

        Ok(config)
    }

    fn load_global(&self) -> Result<Option<Config>> {
        if self.skip_global {
            return Ok(None);
        }

        let dir = match &self.global_dir {
            Some(dir) => dir.clone(),
            None => match dirs::config_dir() {
                Some(dir) => dir.join("appctl"),
                None => return Ok(None),
            },
        };

        load_optional(&dir.join(CONFIG_FILE))
    }
}

/// Built-in defaults every configuration starts from
pub fn builtin_defaults() -> Config {
    Config::new().with(COMMAND_TOPIC_KEY, "application.commands")
}

fn load_optional(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "loading configuration layer");
    Config::load(path).map(Some)
}
