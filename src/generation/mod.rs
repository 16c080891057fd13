//! Schema generation strategies.
//!
//! One strategy is selected per configuration pass. It decides how
//! declarations are dispatched (legacy stacks vs. modern meta-packages)
//! and how manifest fragments are written. Everything else in the resolver
//! is generation-agnostic.

pub mod legacy;
pub mod modern;

use crate::core::dependency::{DependencyKind, DependencyOptions};
use crate::core::generation::Generation;
use crate::core::interface::InterfaceKind;
use crate::core::unit::{Unit, UnitDecl, UnitId, UnitKind};
use crate::manifest::{xml, Category};
use crate::resolver::{ResolveContext, ResolveError};
use crate::util::config::CodegenDeps;

pub use legacy::LegacyStrategy;
pub use modern::ModernStrategy;

/// Opening line of the export envelope.
pub const EXPORT_OPEN: &str = "  <export>";
/// Closing line of the export envelope.
pub const EXPORT_CLOSE: &str = "  </export>";

/// Behavior that differs between schema generations.
pub trait GenerationStrategy: Sync {
    fn generation(&self) -> Generation;

    /// Declare an ordinary package, or a meta-unit when `decl.meta` is set.
    fn declare_package(
        &self,
        ctx: &mut ResolveContext,
        decl: UnitDecl,
    ) -> Result<UnitId, ResolveError>;

    /// Declare a stack (legacy) or its modern analogue.
    fn declare_stack(&self, ctx: &mut ResolveContext, decl: UnitDecl)
        -> Result<UnitId, ResolveError>;

    fn add_build_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError>;

    fn add_run_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError>;

    fn add_stack_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError>;

    /// Manifest file name for a unit of this kind.
    fn manifest_file_name(&self, kind: UnitKind) -> &'static str;

    /// Root element open and metadata block.
    fn header(&self, unit: &Unit) -> Vec<String>;

    /// Root element close.
    fn footer(&self, unit: &Unit) -> Vec<String>;

    /// Category and line for one classified dependency, referenced as a
    /// unit of kind `form`.
    fn dependency_fragment(
        &self,
        form: UnitKind,
        kind: DependencyKind,
        name: &str,
    ) -> (Category, String);

    /// Category and line for an extra dependency, inscribed verbatim.
    fn extra_dependency_fragment(&self, kind: DependencyKind, name: &str) -> (Category, String);

    /// Export entry marking a meta-unit, if the schema has one.
    fn meta_marker(&self, _unit: &Unit) -> Option<String> {
        None
    }

    /// Dependencies a code-generation helper adds when config does not say.
    fn codegen_defaults(&self, kind: InterfaceKind) -> CodegenDeps;
}

/// The strategy for a generation.
pub fn for_generation(generation: Generation) -> &'static dyn GenerationStrategy {
    match generation {
        Generation::Legacy => &legacy::LEGACY,
        Generation::Modern => &modern::MODERN,
    }
}

/// `<TAG plugin="${prefix}/FILE"/>` inside the export envelope.
pub fn plugin_export_line(tag: &str, file: &str) -> String {
    let path = format!("${{prefix}}/{}", file);
    xml::empty(2, tag, &[("plugin", path.as_str())])
}

/// `<maintainer email="...">name</maintainer>`
pub(crate) fn maintainer_line(unit: &Unit) -> String {
    let maintainer = unit.maintainer();
    match maintainer.email.as_deref() {
        Some(email) => xml::text(1, "maintainer", &[("email", email)], &maintainer.name),
        None => xml::text(1, "maintainer", &[], &maintainer.name),
    }
}

pub(crate) fn codegen(build: &[&str], run: &[&str]) -> CodegenDeps {
    CodegenDeps {
        build: build.iter().map(|s| s.to_string()).collect(),
        run: run.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_generation() {
        assert_eq!(for_generation(Generation::Legacy).generation(), Generation::Legacy);
        assert_eq!(for_generation(Generation::Modern).generation(), Generation::Modern);
    }

    #[test]
    fn test_plugin_export_line() {
        assert_eq!(
            plugin_export_line("nav_core", "bgp_plugin.xml"),
            "    <nav_core plugin=\"${prefix}/bgp_plugin.xml\"/>"
        );
    }
}
