//! Command implementations for appctl CLI

pub mod completions;
pub mod helpers;
pub mod init;
pub mod install;
pub mod lifecycle;
pub mod list;
pub mod show;
pub mod site;
pub mod status;
pub mod version;
