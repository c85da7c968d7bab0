//! appctl - lifecycle controller for site-scoped applications
//!
//! Applications are installed on a site from a provider descriptor, then
//! started, stopped and uninstalled through an execution environment that
//! the descriptor is bound to. Every status transition is gated by the
//! [`lifecycle::LifecycleController`].
//!
//! The crate is organized as:
//! - [`domain`] - sites, descriptors, entities and statuses
//! - [`config`] - layered configuration and install-time resolution
//! - [`environment`] - stream providers, the plugin registry and shared environments
//! - [`catalog`] - application providers and the descriptor loader
//! - [`lifecycle`] - the controller, operation context and dependency checks
//! - [`store`] - persistence traits with in-memory implementations
//! - [`workspace`] - the on-disk `.appctl` workspace and its YAML stores
//! - [`runtime`] - wiring of a workspace into a ready controller

pub mod catalog;
pub mod config;
pub mod domain;
pub mod environment;
pub mod error;
pub mod hash;
pub mod lifecycle;
pub mod runtime;
pub mod store;
pub mod workspace;
