//! High-level operations.
//!
//! This module contains the implementation of Manifold commands.

pub mod configure;
pub mod doctor;
pub mod emit;
pub mod graph;
pub mod package;

pub use configure::{configure, ConfigureOptions};
pub use doctor::{doctor, format_report, DoctorOptions, DoctorReport};
pub use emit::{emit_manifests, EmittedFile};
pub use graph::{build_graph, format_graph, BuildGraph, BuildTarget, TargetKind};
pub use package::{format_listing, package_dependencies, PackageDependencies};
