//! Legacy two-tier schema: stacks containing packages.
//!
//! Meta-units are stacks with a `stack.xml`; packages have a
//! `manifest.xml`. Dependencies are attribute-style `<depend .../>`
//! elements shared by build and run time.

use crate::core::dependency::{DependencyKind, DependencyOptions};
use crate::core::generation::Generation;
use crate::core::interface::InterfaceKind;
use crate::core::unit::{Unit, UnitDecl, UnitId, UnitKind};
use crate::generation::{codegen, maintainer_line, GenerationStrategy};
use crate::manifest::{xml, Category};
use crate::resolver::{ResolveContext, ResolveError};
use crate::util::config::CodegenDeps;

pub(crate) static LEGACY: LegacyStrategy = LegacyStrategy;

/// Strategy for distributions before the modern threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyStrategy;

impl LegacyStrategy {
    fn root_tag(kind: UnitKind) -> &'static str {
        match kind {
            UnitKind::Package => "package",
            UnitKind::Stack => "stack",
        }
    }
}

/// Split the names a package depends on into registered stacks and the
/// rest. Stack owners keep every name.
fn split_stack_names(
    ctx: &ResolveContext,
    unit: &str,
    names: &[String],
) -> Result<(Vec<String>, Vec<String>), ResolveError> {
    if ctx.unit(unit)?.kind() == UnitKind::Stack {
        return Ok((Vec::new(), names.to_vec()));
    }

    Ok(names.iter().cloned().partition(|name| {
        ctx.registry()
            .get(name)
            .is_ok_and(|dep| dep.kind() == UnitKind::Stack)
    }))
}

impl GenerationStrategy for LegacyStrategy {
    fn generation(&self) -> Generation {
        Generation::Legacy
    }

    fn declare_package(
        &self,
        ctx: &mut ResolveContext,
        decl: UnitDecl,
    ) -> Result<UnitId, ResolveError> {
        if decl.meta {
            tracing::debug!("meta package `{}` declared as a stack", decl.name);
            return self.declare_stack(ctx, decl);
        }
        ctx.register_unit(UnitKind::Package, decl)
    }

    fn declare_stack(
        &self,
        ctx: &mut ResolveContext,
        decl: UnitDecl,
    ) -> Result<UnitId, ResolveError> {
        ctx.register_unit(UnitKind::Stack, decl)
    }

    fn add_build_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let (stacks, rest) = split_stack_names(ctx, unit, names)?;
        if !stacks.is_empty() {
            tracing::debug!("build dependencies of `{}` on stacks added as stack dependencies", unit);
            ctx.resolve_stack_dependencies(unit, &stacks, options)?;
        }
        ctx.resolve_build_dependencies(unit, &rest, options)
    }

    fn add_run_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        if ctx.unit(unit)?.kind() == UnitKind::Stack {
            tracing::debug!("run dependencies of stack `{}` added as stack dependencies", unit);
            return self.add_stack_dependencies(ctx, unit, names, options);
        }

        let (stacks, rest) = split_stack_names(ctx, unit, names)?;
        if !stacks.is_empty() {
            tracing::debug!("run dependencies of `{}` on stacks added as stack dependencies", unit);
            ctx.resolve_stack_dependencies(unit, &stacks, options)?;
        }
        ctx.resolve_run_dependencies(unit, &rest, options)
    }

    fn add_stack_dependencies(
        &self,
        ctx: &mut ResolveContext,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let found = ctx.unit(unit)?.kind();
        if found != UnitKind::Stack {
            return Err(ResolveError::UnitKindMismatch {
                unit: unit.to_string(),
                expected: UnitKind::Stack,
                found,
            });
        }
        ctx.resolve_stack_dependencies(unit, names, options)
    }

    fn manifest_file_name(&self, kind: UnitKind) -> &'static str {
        match kind {
            UnitKind::Package => "manifest.xml",
            UnitKind::Stack => "stack.xml",
        }
    }

    fn header(&self, unit: &Unit) -> Vec<String> {
        let mut lines = vec![
            xml::open(0, Self::root_tag(unit.kind()), &[]),
            xml::text(
                1,
                "description",
                &[("brief", unit.name())],
                unit.description(),
            ),
        ];
        lines.extend(
            unit.authors()
                .iter()
                .map(|author| xml::text(1, "author", &[], author)),
        );
        lines.push(maintainer_line(unit));
        lines.push(xml::text(1, "license", &[], unit.license()));
        if let Some(url) = unit.url() {
            lines.push(xml::text(1, "url", &[], url));
        }
        lines
    }

    fn footer(&self, unit: &Unit) -> Vec<String> {
        vec![xml::close(0, Self::root_tag(unit.kind()))]
    }

    fn dependency_fragment(
        &self,
        form: UnitKind,
        _kind: DependencyKind,
        name: &str,
    ) -> (Category, String) {
        let attr = Self::root_tag(form);
        (Category::Depend, xml::empty(1, "depend", &[(attr, name)]))
    }

    fn extra_dependency_fragment(&self, _kind: DependencyKind, name: &str) -> (Category, String) {
        (Category::ExtraDepend, xml::empty(1, "rosdep", &[("name", name)]))
    }

    fn codegen_defaults(&self, kind: InterfaceKind) -> CodegenDeps {
        match kind {
            InterfaceKind::Message | InterfaceKind::Service => codegen(&["roslang"], &[]),
            InterfaceKind::Config => codegen(&["dynamic_reconfigure"], &[]),
        }
    }
}
