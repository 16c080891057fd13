//! Dependency classification and resolution.
//!
//! Every dependency name is classified exactly once, against the registry
//! as it stands at the time of the call. Internal build dependencies pull
//! in the compile/link environment of their whole internal closure;
//! external build dependencies are discovered on the host. Run
//! dependencies are only recorded.

use std::collections::HashSet;

use crate::core::dependency::{Classified, DependencyKind, DependencyOptions};
use crate::core::registry::PackageRegistry;
use crate::core::unit::{UnitDecl, UnitId, UnitKind};
use crate::generation::{GenerationStrategy, EXPORT_CLOSE, EXPORT_OPEN};
use crate::manifest::{Category, ManifestAssembler};
use crate::resolver::ResolveError;
use crate::sources::external::ExternalResolver;
use crate::util::OrderedSet;

/// Accumulated compile/link environment of an internal closure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    pub include_dirs: OrderedSet,
    pub link_libraries: OrderedSet,
    pub link_flags: OrderedSet,
}

/// Resolves dependencies for one call, borrowing the context's state.
pub struct DependencyResolver<'a> {
    registry: &'a mut PackageRegistry,
    assembler: &'a mut ManifestAssembler,
    external: &'a mut ExternalResolver,
    strategy: &'static dyn GenerationStrategy,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        registry: &'a mut PackageRegistry,
        assembler: &'a mut ManifestAssembler,
        external: &'a mut ExternalResolver,
        strategy: &'static dyn GenerationStrategy,
    ) -> Self {
        DependencyResolver {
            registry,
            assembler,
            external,
            strategy,
        }
    }

    /// Register a unit and open its manifest.
    pub fn register_unit(&mut self, kind: UnitKind, decl: UnitDecl) -> Result<UnitId, ResolveError> {
        let id = self.registry.register(kind, decl)?;

        let unit = self.registry.unit(id);
        let handle = self.assembler.open(
            unit.name(),
            self.strategy.header(unit),
            self.strategy.footer(unit),
        );

        if let Some(marker) = self.strategy.meta_marker(unit) {
            self.assembler
                .write_fragment(handle, Category::ExportOpen, "", vec![EXPORT_OPEN.to_string()]);
            self.assembler
                .write_fragment(handle, Category::Export, "metapackage", vec![marker]);
            self.assembler.write_fragment(
                handle,
                Category::ExportClose,
                "",
                vec![EXPORT_CLOSE.to_string()],
            );
        }

        self.registry.unit_mut(id).manifest_handle = Some(handle);
        Ok(id)
    }

    /// Add build dependencies to `unit`.
    ///
    /// Meta-units reject build dependencies outright. Internal names merge
    /// the build environment of their closure; external names are
    /// discovered on the host and fail unless `options.optional` is set.
    pub fn add_build_dependencies(
        &mut self,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let id = self.lookup(unit)?;
        if self.registry.unit(id).is_meta() {
            return Err(ResolveError::MetaBuildDependency {
                unit: unit.to_string(),
                dependencies: names.to_vec(),
            });
        }

        for name in names {
            let classified = self.registry.classify(name);
            if !options.filter.accepts(&classified) {
                tracing::debug!("{}: skipping build dependency `{}` ({:?})", unit, name, options.filter);
                continue;
            }

            match classified {
                Classified::Internal(dep) => {
                    if dep == id {
                        tracing::warn!("unit `{}` cannot depend on itself", unit);
                        continue;
                    }

                    tracing::debug!("{}: `{}` is an internal build dependency", unit, name);
                    let env = self.closure_environment(dep);
                    let target = self.registry.unit_mut(id);
                    target.include_dirs.extend(env.include_dirs.iter());
                    target.link_libraries.extend(env.link_libraries.iter());
                    target.link_flags.extend(env.link_flags.iter());
                    target.internal_build_deps.insert(name.as_str());
                    if target.external_build_deps.remove(name) {
                        tracing::debug!("{}: `{}` reclassified as internal", unit, name);
                        self.rebuild_environment(id);
                    }
                }
                Classified::External(ref external) => {
                    let Some(found) = self.external.discover(external) else {
                        if options.optional {
                            tracing::warn!(
                                "optional dependency `{}` of `{}` not found, skipping",
                                external,
                                unit
                            );
                            continue;
                        }
                        return Err(ResolveError::ExternalDependencyNotFound {
                            unit: unit.to_string(),
                            dependency: external.clone(),
                        });
                    };

                    tracing::debug!("{}: `{}` is an external build dependency", unit, name);
                    let target = self.registry.unit_mut(id);
                    target.include_dirs.extend(found.include_dirs.iter());
                    target.link_libraries.extend(found.libraries.iter());
                    target
                        .link_flags
                        .extend(found.library_dirs.iter().map(|dir| format!("-L{}", dir)));
                    target.link_flags.extend(found.link_flags.iter());
                    target.external_build_deps.insert(name.as_str());
                }
            }

            self.write_dependency(id, DependencyKind::Build, name);
        }

        Ok(())
    }

    /// Add run dependencies to `unit`. Nothing is discovered or merged.
    pub fn add_run_dependencies(
        &mut self,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let id = self.lookup(unit)?;
        let owner = self.registry.unit(id).kind();
        self.record_run_dependencies(id, owner, names, options);
        Ok(())
    }

    /// Add dependencies on stacks to `unit`, written as stack references
    /// whatever the owner's kind. Recorded like run dependencies.
    pub fn add_stack_dependencies(
        &mut self,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let id = self.lookup(unit)?;
        self.record_run_dependencies(id, UnitKind::Stack, names, options);
        Ok(())
    }

    fn record_run_dependencies(
        &mut self,
        id: UnitId,
        form: UnitKind,
        names: &[String],
        options: DependencyOptions,
    ) {
        let unit = self.registry.unit(id).name().to_string();

        for name in names {
            let classified = self.registry.classify(name);
            if !options.filter.accepts(&classified) {
                tracing::debug!("{}: skipping run dependency `{}` ({:?})", unit, name, options.filter);
                continue;
            }

            let target = self.registry.unit_mut(id);
            match classified {
                Classified::Internal(_) => {
                    target.external_run_deps.remove(name);
                    target.internal_run_deps.insert(name.as_str());
                }
                Classified::External(_) => {
                    target.external_run_deps.insert(name.as_str());
                }
            }

            self.write_dependency_as(id, form, DependencyKind::Run, name);
        }
    }

    /// Record system requirements verbatim, bypassing classification.
    pub fn add_extra_dependencies(
        &mut self,
        unit: &str,
        kind: DependencyKind,
        names: &[String],
    ) -> Result<(), ResolveError> {
        let id = self.lookup(unit)?;
        if kind == DependencyKind::Build && self.registry.unit(id).is_meta() {
            return Err(ResolveError::MetaBuildDependency {
                unit: unit.to_string(),
                dependencies: names.to_vec(),
            });
        }

        for name in names {
            let target = self.registry.unit_mut(id);
            match kind {
                DependencyKind::Build => target.extra_build_deps.insert(name.as_str()),
                DependencyKind::Run => target.extra_run_deps.insert(name.as_str()),
            };

            let (category, line) = self.strategy.extra_dependency_fragment(kind, name);
            self.write(id, category, name, line);
        }

        Ok(())
    }

    /// Record what `unit` provides to its dependents.
    pub fn export_build_interface(
        &mut self,
        unit: &str,
        include_dirs: &[String],
        libraries: &[String],
    ) -> Result<(), ResolveError> {
        let id = self.lookup(unit)?;
        let target = self.registry.unit_mut(id);

        target.exported_include_dirs.extend(include_dirs.iter());
        target.include_dirs.extend(include_dirs.iter());
        target.exported_libraries.extend(libraries.iter());
        target.link_libraries.extend(libraries.iter());
        Ok(())
    }

    /// Build environment of `root` and every unit reachable through
    /// internal build dependencies, each unit visited once.
    pub fn closure_environment(&self, root: UnitId) -> BuildEnvironment {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit(root, &mut visited, &mut order);

        let mut env = BuildEnvironment::default();
        for id in order {
            let unit = self.registry.unit(id);
            env.include_dirs.extend(unit.include_dirs.iter());
            env.link_libraries.extend(unit.link_libraries.iter());
            env.link_flags.extend(unit.link_flags.iter());
        }
        env
    }

    /// Recompute the accumulated environment of `id` from its exported
    /// interface, its internal closures and the cached discoveries of its
    /// remaining external build dependencies.
    fn rebuild_environment(&mut self, id: UnitId) {
        let unit = self.registry.unit(id);
        let mut env = BuildEnvironment::default();
        env.include_dirs.extend(unit.exported_include_dirs.iter());
        env.link_libraries.extend(unit.exported_libraries.iter());

        for dep in unit.internal_build_deps.iter() {
            if let Some(dep_id) = self.registry.lookup(dep) {
                let closure = self.closure_environment(dep_id);
                env.include_dirs.extend(closure.include_dirs.iter());
                env.link_libraries.extend(closure.link_libraries.iter());
                env.link_flags.extend(closure.link_flags.iter());
            }
        }

        for dep in unit.external_build_deps.iter() {
            if let Some(Some(found)) = self.external.cached(dep) {
                env.include_dirs.extend(found.include_dirs.iter());
                env.link_libraries.extend(found.libraries.iter());
                env.link_flags
                    .extend(found.library_dirs.iter().map(|dir| format!("-L{}", dir)));
                env.link_flags.extend(found.link_flags.iter());
            }
        }

        let target = self.registry.unit_mut(id);
        target.include_dirs = env.include_dirs;
        target.link_libraries = env.link_libraries;
        target.link_flags = env.link_flags;
    }

    fn visit(&self, id: UnitId, visited: &mut HashSet<UnitId>, order: &mut Vec<UnitId>) {
        if !visited.insert(id) {
            return;
        }
        order.push(id);

        for dep in self.registry.unit(id).internal_build_deps.iter() {
            if let Some(dep_id) = self.registry.lookup(dep) {
                self.visit(dep_id, visited, order);
            }
        }
    }

    fn lookup(&self, unit: &str) -> Result<UnitId, ResolveError> {
        self.registry
            .lookup(unit)
            .ok_or_else(|| ResolveError::UndefinedUnit {
                name: unit.to_string(),
            })
    }

    fn write_dependency(&mut self, id: UnitId, kind: DependencyKind, name: &str) {
        let owner = self.registry.unit(id).kind();
        self.write_dependency_as(id, owner, kind, name);
    }

    fn write_dependency_as(&mut self, id: UnitId, form: UnitKind, kind: DependencyKind, name: &str) {
        let (category, line) = self.strategy.dependency_fragment(form, kind, name);
        self.write(id, category, name, line);
    }

    fn write(&mut self, id: UnitId, category: Category, sub_order: &str, line: String) {
        if let Some(handle) = self.registry.unit(id).manifest_handle() {
            self.assembler
                .write_fragment(handle, category, sub_order, vec![line]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::Generation;
    use crate::generation::for_generation;
    use crate::test_support::MockHostTools;

    struct Fixture {
        registry: PackageRegistry,
        assembler: ManifestAssembler,
        external: ExternalResolver,
    }

    impl Fixture {
        fn new(tools: MockHostTools) -> Self {
            Fixture {
                registry: PackageRegistry::new(),
                assembler: ManifestAssembler::new(),
                external: ExternalResolver::new(Box::new(tools)),
            }
        }

        fn resolver(&mut self) -> DependencyResolver<'_> {
            DependencyResolver::new(
                &mut self.registry,
                &mut self.assembler,
                &mut self.external,
                for_generation(Generation::Modern),
            )
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transitive_include_dirs() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        for name in ["core", "mid", "top"] {
            resolver
                .register_unit(UnitKind::Package, UnitDecl::package(name))
                .unwrap();
        }
        resolver
            .export_build_interface("core", &names(&["/core/inc"]), &names(&["core"]))
            .unwrap();
        resolver
            .export_build_interface("mid", &names(&["/mid/inc"]), &[])
            .unwrap();
        resolver
            .add_build_dependencies("mid", &names(&["core"]), DependencyOptions::default())
            .unwrap();
        resolver
            .add_build_dependencies("top", &names(&["mid"]), DependencyOptions::default())
            .unwrap();

        let top = fx.registry.get("top").unwrap();
        assert!(top.include_dirs().contains("/core/inc"));
        assert!(top.include_dirs().contains("/mid/inc"));
        assert!(top.link_libraries().contains("core"));
        assert_eq!(top.internal_build_deps(), &["mid"]);
    }

    #[test]
    fn test_closure_reaches_late_edges() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        for name in ["core", "mid", "top"] {
            resolver
                .register_unit(UnitKind::Package, UnitDecl::package(name))
                .unwrap();
        }
        resolver
            .export_build_interface("core", &names(&["/core/inc"]), &[])
            .unwrap();
        resolver
            .add_build_dependencies("mid", &names(&["core"]), DependencyOptions::default())
            .unwrap();
        // Only the recorded edge mid -> core can supply core's dirs now.
        resolver.registry.unit_mut(UnitId::new(1)).include_dirs = OrderedSet::new();
        resolver
            .add_build_dependencies("top", &names(&["mid"]), DependencyOptions::default())
            .unwrap();

        assert!(fx.registry.get("top").unwrap().include_dirs().contains("/core/inc"));
    }

    #[test]
    fn test_closure_survives_cycles() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        for name in ["a", "b"] {
            resolver
                .register_unit(UnitKind::Package, UnitDecl::package(name))
                .unwrap();
        }
        resolver
            .add_build_dependencies("a", &names(&["b"]), DependencyOptions::default())
            .unwrap();
        resolver
            .add_build_dependencies("b", &names(&["a"]), DependencyOptions::default())
            .unwrap();

        let env = resolver.closure_environment(UnitId::new(0));
        assert!(env.include_dirs.is_empty());
    }

    #[test]
    fn test_build_dependencies_idempotent() {
        let tools = MockHostTools::new().with_pkg_config("zlib", &["/usr/include"], &["z"]);
        let mut fx = Fixture::new(tools);
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("core"))
            .unwrap();
        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("app"))
            .unwrap();

        let deps = names(&["core", "zlib", "core"]);
        resolver
            .add_build_dependencies("app", &deps, DependencyOptions::default())
            .unwrap();
        let once = fx.registry.get("app").unwrap().clone();

        let mut resolver = fx.resolver();
        resolver
            .add_build_dependencies("app", &deps, DependencyOptions::default())
            .unwrap();
        let twice = fx.registry.get("app").unwrap();

        assert_eq!(once.internal_build_deps(), twice.internal_build_deps());
        assert_eq!(once.external_build_deps(), twice.external_build_deps());
        assert_eq!(twice.internal_build_deps(), &["core"]);
        assert_eq!(twice.external_build_deps(), &["zlib"]);
        assert_eq!(twice.link_libraries(), &["z"]);
    }

    #[test]
    fn test_meta_unit_rejects_build_dependencies() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::meta("nav_stack"))
            .unwrap();
        let err = resolver
            .add_build_dependencies("nav_stack", &names(&["roscpp"]), DependencyOptions::default())
            .unwrap_err();

        assert!(matches!(err, ResolveError::MetaBuildDependency { ref unit, .. } if unit == "nav_stack"));
    }

    #[test]
    fn test_required_external_not_found() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("app"))
            .unwrap();
        let err = resolver
            .add_build_dependencies("app", &names(&["missing"]), DependencyOptions::default())
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::ExternalDependencyNotFound {
                unit: "app".to_string(),
                dependency: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_optional_external_is_skipped() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("app"))
            .unwrap();
        resolver
            .add_build_dependencies("app", &names(&["missing"]), DependencyOptions::default().optional())
            .unwrap();

        let app = fx.registry.get("app").unwrap();
        assert!(app.external_build_deps().is_empty());
        let handle = app.manifest_handle().unwrap();
        assert!(!fx.assembler.assemble(handle).contains("missing"));
    }

    #[test]
    fn test_filters() {
        let tools = MockHostTools::new().with_pkg_config("zlib", &[], &["z"]);
        let calls = tools.calls();
        let mut fx = Fixture::new(tools);
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("core"))
            .unwrap();
        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("app"))
            .unwrap();
        resolver
            .add_build_dependencies("app", &names(&["core", "zlib"]), DependencyOptions::internal_only())
            .unwrap();
        resolver
            .add_run_dependencies("app", &names(&["core", "zlib"]), DependencyOptions::external_only())
            .unwrap();

        let app = fx.registry.get("app").unwrap();
        assert_eq!(app.internal_build_deps(), &["core"]);
        assert!(app.external_build_deps().is_empty());
        assert!(app.internal_run_deps().is_empty());
        assert_eq!(app.external_run_deps(), &["zlib"]);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_run_dependency_reclassified_after_registration() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("nav_core"))
            .unwrap();
        resolver
            .add_run_dependencies("nav_core", &names(&["nav_msgs"]), DependencyOptions::default())
            .unwrap();
        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("nav_msgs"))
            .unwrap();
        resolver
            .add_run_dependencies("nav_core", &names(&["nav_msgs"]), DependencyOptions::default())
            .unwrap();

        let nav_core = fx.registry.get("nav_core").unwrap();
        assert_eq!(nav_core.internal_run_deps(), &["nav_msgs"]);
        assert!(nav_core.external_run_deps().is_empty());

        let text = fx.assembler.assemble(nav_core.manifest_handle().unwrap());
        assert_eq!(text.matches("<run_depend>nav_msgs</run_depend>").count(), 1);
    }

    #[test]
    fn test_build_dependency_reclassified_drops_host_environment() {
        let tools = MockHostTools::new().with_pkg_config(
            "nav_util",
            &["/usr/include/nav_util"],
            &["nav_util_host"],
        );
        let mut fx = Fixture::new(tools);
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("nav_core"))
            .unwrap();
        resolver
            .add_build_dependencies("nav_core", &names(&["nav_util"]), DependencyOptions::default())
            .unwrap();
        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("nav_util"))
            .unwrap();
        resolver
            .export_build_interface("nav_util", &names(&["include"]), &names(&["nav_util"]))
            .unwrap();
        resolver
            .add_build_dependencies("nav_core", &names(&["nav_util"]), DependencyOptions::default())
            .unwrap();

        let nav_core = fx.registry.get("nav_core").unwrap();
        assert!(nav_core.external_build_deps().is_empty());
        assert_eq!(nav_core.internal_build_deps(), &["nav_util"]);
        assert_eq!(nav_core.include_dirs(), &["include"]);
        assert_eq!(nav_core.link_libraries(), &["nav_util"]);
    }

    #[test]
    fn test_run_dependencies_never_discover() {
        let tools = MockHostTools::new();
        let calls = tools.calls();
        let mut fx = Fixture::new(tools);
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("app"))
            .unwrap();
        resolver
            .add_run_dependencies("app", &names(&["python_yaml"]), DependencyOptions::default())
            .unwrap();

        assert!(calls.is_empty());
        assert!(fx.registry.get("app").unwrap().include_dirs().is_empty());
    }

    #[test]
    fn test_extra_dependencies_bypass_classification() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("core"))
            .unwrap();
        resolver
            .register_unit(UnitKind::Package, UnitDecl::package("app"))
            .unwrap();
        resolver
            .add_extra_dependencies("app", DependencyKind::Build, &names(&["core", "eigen", "eigen"]))
            .unwrap();

        let app = fx.registry.get("app").unwrap();
        assert_eq!(app.extra_build_deps(), &["core", "eigen"]);
        assert!(app.internal_build_deps().is_empty());
    }

    #[test]
    fn test_undefined_unit() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        let err = resolver
            .add_run_dependencies("ghost", &names(&["x"]), DependencyOptions::default())
            .unwrap_err();
        assert_eq!(err, ResolveError::UndefinedUnit { name: "ghost".to_string() });
    }

    #[test]
    fn test_modern_meta_marker_written_on_registration() {
        let mut fx = Fixture::new(MockHostTools::new());
        let mut resolver = fx.resolver();

        let id = resolver
            .register_unit(UnitKind::Package, UnitDecl::meta("navigation"))
            .unwrap();

        let handle = fx.registry.unit(id).manifest_handle().unwrap();
        let text = fx.assembler.assemble(handle);
        assert!(text.contains("  <export>\n    <metapackage/>\n  </export>\n</package>"));
    }
}
