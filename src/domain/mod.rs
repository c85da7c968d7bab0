//! Domain models for appctl
//!
//! This module contains pure domain objects representing core business entities.
//! These types are free of external dependencies and contain business rules invariants.

pub mod descriptor;
pub mod entity;
pub mod site;

pub use descriptor::{
    ApplicationDependency, ApplicationDescriptor, EnvironmentKind, Property, StreamDefinition,
};
pub use entity::{ApplicationEntity, ApplicationRef, Configuration, DeployMode, Status};
pub use site::Site;
