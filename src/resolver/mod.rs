//! Dependency resolution.
//!
//! Classification of dependency names into internal units and host
//! dependencies, transitive propagation of build environments, and the
//! context object that owns all state of one configuration pass.

pub mod context;
pub mod dependency;
pub mod errors;

pub use context::{PluginManifest, ResolveContext};
pub use dependency::{BuildEnvironment, DependencyResolver};
pub use errors::ResolveError;
