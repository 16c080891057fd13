//! Modern flat schema: packages, some marked as meta-packages.

use crate::core::dependency::{DependencyKind, DependencyOptions};
use crate::core::generation::Generation;
use crate::core::interface::InterfaceKind;
use crate::core::unit::{Unit, UnitDecl, UnitId, UnitKind};
use crate::generation::{codegen, maintainer_line, GenerationStrategy};
use crate::manifest::{xml, Category};
use crate::resolver::{ResolveContext, ResolveError};
use crate::util::config::CodegenDeps;

pub(crate) static MODERN: ModernStrategy = ModernStrategy;

/// Strategy for distributions at or after the modern threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModernStrategy;

impl GenerationStrategy for ModernStrategy {
    fn generation(&self) -> Generation {
        Generation::Modern
    }

    fn declare_package(
        &self,
        ctx: &mut ResolveContext,
        decl: UnitDecl,
    ) -> Result<UnitId, ResolveError> {
        ctx.register_unit(UnitKind::Package, decl)
    }

    fn declare_stack(
        &self,
        ctx: &mut ResolveContext,
        mut decl: UnitDecl,
    ) -> Result<UnitId, ResolveError> {
        tracing::debug!("stack `{}` declared as a meta package", decl.name);
        decl.meta = true;
        self.declare_package(ctx, decl)
    }

    fn add_build_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        ctx.resolve_build_dependencies(unit, names, options)
    }

    fn add_run_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        ctx.resolve_run_dependencies(unit, names, options)
    }

    fn add_stack_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        self.add_run_dependencies(ctx, unit, names, options)
    }

    fn manifest_file_name(&self, _kind: UnitKind) -> &'static str {
        "package.xml"
    }

    fn header(&self, unit: &Unit) -> Vec<String> {
        let version = unit.version().to_string();
        let mut lines = vec![
            "<?xml version=\"1.0\"?>".to_string(),
            xml::open(0, "package", &[]),
            xml::text(1, "name", &[], unit.name()),
            xml::text(1, "version", &[], &version),
            xml::text(1, "description", &[], unit.description()),
            maintainer_line(unit),
            xml::text(1, "license", &[], unit.license()),
        ];
        if let Some(url) = unit.url() {
            lines.push(xml::text(1, "url", &[], url));
        }
        lines.extend(
            unit.authors()
                .iter()
                .map(|author| xml::text(1, "author", &[], author)),
        );
        lines
    }

    fn footer(&self, _unit: &Unit) -> Vec<String> {
        vec![xml::close(0, "package")]
    }

    fn dependency_fragment(
        &self,
        _form: UnitKind,
        kind: DependencyKind,
        name: &str,
    ) -> (Category, String) {
        match kind {
            DependencyKind::Build => (
                Category::BuildDepend,
                xml::text(1, "build_depend", &[], name),
            ),
            DependencyKind::Run => (Category::RunDepend, xml::text(1, "run_depend", &[], name)),
        }
    }

    fn extra_dependency_fragment(&self, kind: DependencyKind, name: &str) -> (Category, String) {
        self.dependency_fragment(UnitKind::Package, kind, name)
    }

    fn meta_marker(&self, unit: &Unit) -> Option<String> {
        unit.is_meta().then(|| xml::empty(2, "metapackage", &[]))
    }

    fn codegen_defaults(&self, kind: InterfaceKind) -> CodegenDeps {
        match kind {
            InterfaceKind::Message | InterfaceKind::Service => {
                codegen(&["message_generation"], &["message_runtime"])
            }
            InterfaceKind::Config => codegen(&["dynamic_reconfigure"], &["dynamic_reconfigure"]),
        }
    }
}
