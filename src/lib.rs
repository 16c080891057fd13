//! Manifold - a dependency resolver and manifest assembler for multi-unit
//! distributions.
//!
//! This crate provides the core library functionality for Manifold:
//! classification of dependencies into internal units and host
//! dependencies, transitive build environments, and per-generation
//! manifest documents.

pub mod core;
pub mod generation;
pub mod manifest;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for Manifold unit tests.
///
/// This module is only available when running tests. It provides a
/// scripted host tool implementation and ready-made contexts.
#[cfg(test)]
pub mod test_support;

pub use crate::core::distribution::Description;
pub use crate::core::generation::Generation;
pub use crate::core::unit::{Unit, UnitDecl};
pub use resolver::{ResolveContext, ResolveError};
pub use util::context::GlobalContext;
