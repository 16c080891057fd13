//! Core data structures for Manifold.
//!
//! This module contains the foundational types used throughout Manifold:
//! - Units (packages and stacks) and their registry
//! - Dependency classification
//! - Distribution descriptors and generation selection
//! - The Distribution.toml description file

pub mod dependency;
pub mod distribution;
pub mod generation;
pub mod interface;
pub mod plugin;
pub mod registry;
pub mod unit;

pub use dependency::{DependencyKind, DependencyOptions};
pub use distribution::{Description, DISTRIBUTION_FILE};
pub use generation::{DistributionDescriptor, Generation, GenerationSelector};
pub use interface::InterfaceKind;
pub use plugin::{PluginClass, PluginDecl};
pub use registry::PackageRegistry;
pub use unit::{Person, Unit, UnitDecl, UnitId, UnitKind};
