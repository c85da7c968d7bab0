//! Configuration handling for appctl
//!
//! This module contains:
//! - [`Config`] - the hierarchical global configuration tree
//! - [`ConfigLoader`] - layered loading of built-in, global and workspace config
//! - [`resolver`] - install-time merge of descriptor defaults and overrides

pub mod loader;
pub mod resolver;
pub mod settings;

// Re-export commonly used types
pub use loader::{COMMAND_TOPIC_KEY, ConfigLoader, WORKSPACE_DIR_KEY};
pub use settings::Config;
