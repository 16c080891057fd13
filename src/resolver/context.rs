//! The resolution context.
//!
//! One `ResolveContext` holds everything a configuration pass accumulates:
//! the registry, the manifest documents, the external lookup caches and the
//! generation selector. Independent contexts never share state.

use crate::core::dependency::{DependencyKind, DependencyOptions};
use crate::core::generation::{DistributionDescriptor, Generation, GenerationSelector};
use crate::core::interface::InterfaceKind;
use crate::core::plugin::PluginDecl;
use crate::core::registry::PackageRegistry;
use crate::core::unit::{Unit, UnitDecl, UnitId, UnitKind};
use crate::generation::{
    for_generation, plugin_export_line, GenerationStrategy, EXPORT_CLOSE, EXPORT_OPEN,
};
use crate::manifest::{xml, Category, ManifestAssembler, ManifestHandle};
use crate::resolver::dependency::DependencyResolver;
use crate::resolver::ResolveError;
use crate::sources::external::ExternalResolver;
use crate::sources::tools::HostTools;
use crate::util::config::{CodegenConfig, Config};

/// A plugin manifest document owned by a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    pub unit: String,
    pub file: String,
    pub library: String,
    handle: ManifestHandle,
}

impl PluginManifest {
    pub fn handle(&self) -> ManifestHandle {
        self.handle
    }
}

/// State of one configuration pass.
#[derive(Debug)]
pub struct ResolveContext {
    registry: PackageRegistry,
    assembler: ManifestAssembler,
    plugin_assembler: ManifestAssembler,
    external: ExternalResolver,
    selector: GenerationSelector,
    codegen: CodegenConfig,
    plugin_manifests: Vec<PluginManifest>,
}

fn to_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|s| s.as_ref().to_string()).collect()
}

impl ResolveContext {
    /// Create a context with no distribution information.
    pub fn new(tools: Box<dyn HostTools>) -> Self {
        ResolveContext {
            registry: PackageRegistry::new(),
            assembler: ManifestAssembler::new(),
            plugin_assembler: ManifestAssembler::new(),
            external: ExternalResolver::new(tools),
            selector: GenerationSelector::default(),
            codegen: CodegenConfig::default(),
            plugin_manifests: Vec::new(),
        }
    }

    /// Create a context from loaded configuration.
    ///
    /// Header defaults and code-generation dependencies come from `config`;
    /// so does the distribution descriptor when `[distribution] name` is set.
    pub fn from_config(config: &Config, tools: Box<dyn HostTools>) -> Result<Self, ResolveError> {
        let mut ctx = ResolveContext::new(tools);
        ctx.registry = PackageRegistry::with_defaults(config.defaults.clone());
        ctx.codegen = config.codegen.clone();

        if let Some(ref name) = config.distribution.name {
            let mut descriptor = DistributionDescriptor::new(name)?;
            if let Some(generation) = config.distribution.generation {
                descriptor = descriptor.with_generation(generation);
            }
            ctx.observe_distribution(descriptor)?;
        }

        Ok(ctx)
    }

    /// Supply distribution information.
    ///
    /// Fails once the generation is fixed and `descriptor` contradicts it.
    pub fn observe_distribution(&mut self, descriptor: DistributionDescriptor) -> Result<(), ResolveError> {
        self.selector.observe(descriptor)
    }

    /// The schema generation, selecting it on first use.
    pub fn generation(&mut self) -> Result<Generation, ResolveError> {
        self.selector.select()
    }

    /// The strategy for the selected generation.
    pub fn strategy(&mut self) -> Result<&'static dyn GenerationStrategy, ResolveError> {
        self.generation().map(for_generation)
    }

    /// Strategy, if the generation was already fixed.
    fn selected_strategy(&self) -> Result<&'static dyn GenerationStrategy, ResolveError> {
        self.selector
            .selected()
            .map(for_generation)
            .ok_or_else(|| ResolveError::InvalidDistributionState {
                reason: "the schema generation has not been selected yet".to_string(),
            })
    }

    fn resolver(&mut self, strategy: &'static dyn GenerationStrategy) -> DependencyResolver<'_> {
        DependencyResolver::new(
            &mut self.registry,
            &mut self.assembler,
            &mut self.external,
            strategy,
        )
    }

    // Declarations

    /// Declare a package. With `decl.meta` set this declares a meta-unit,
    /// which under the legacy schema is a stack.
    pub fn declare_package(&mut self, decl: UnitDecl) -> Result<UnitId, ResolveError> {
        let strategy = self.strategy()?;
        strategy.declare_package(self, decl)
    }

    /// Declare a stack. Under the modern schema this declares a meta-package.
    pub fn declare_stack(&mut self, decl: UnitDecl) -> Result<UnitId, ResolveError> {
        let strategy = self.strategy()?;
        strategy.declare_stack(self, decl)
    }

    /// Register a unit of a concrete kind and open its manifest.
    pub(crate) fn register_unit(&mut self, kind: UnitKind, decl: UnitDecl) -> Result<UnitId, ResolveError> {
        let strategy = self.strategy()?;
        let id = self.resolver(strategy).register_unit(kind, decl)?;

        let unit = self.registry.unit(id);
        tracing::info!(
            "declared {} `{}`{}",
            unit.kind(),
            unit.name(),
            if unit.is_meta() { " (meta)" } else { "" }
        );
        Ok(id)
    }

    // Dependencies

    pub fn add_build_dependencies<I, S>(
        &mut self,
        unit: &str,
        names: I,
        options: DependencyOptions,
    ) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strategy = self.strategy()?;
        strategy.add_build_dependencies(self, unit, &to_names(names), options)
    }

    pub fn add_run_dependencies<I, S>(
        &mut self,
        unit: &str,
        names: I,
        options: DependencyOptions,
    ) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strategy = self.strategy()?;
        strategy.add_run_dependencies(self, unit, &to_names(names), options)
    }

    /// Dependencies of one stack on other stacks.
    pub fn add_stack_dependencies<I, S>(&mut self, unit: &str, names: I) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strategy = self.strategy()?;
        strategy.add_stack_dependencies(self, unit, &to_names(names), DependencyOptions::default())
    }

    /// Build dependency resolution proper, after generation dispatch.
    pub(crate) fn resolve_build_dependencies(
        &mut self,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let strategy = self.strategy()?;
        self.resolver(strategy)
            .add_build_dependencies(unit, names, options)
    }

    /// Stack dependency resolution proper, after generation dispatch.
    pub(crate) fn resolve_stack_dependencies(
        &mut self,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let strategy = self.strategy()?;
        self.resolver(strategy)
            .add_stack_dependencies(unit, names, options)
    }

    /// Run dependency resolution proper, after generation dispatch.
    pub(crate) fn resolve_run_dependencies(
        &mut self,
        unit: &str,
        names: &[String],
        options: DependencyOptions,
    ) -> Result<(), ResolveError> {
        let strategy = self.strategy()?;
        self.resolver(strategy)
            .add_run_dependencies(unit, names, options)
    }

    pub fn add_extra_dependencies<I, S>(
        &mut self,
        unit: &str,
        kind: DependencyKind,
        names: I,
    ) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strategy = self.strategy()?;
        self.resolver(strategy)
            .add_extra_dependencies(unit, kind, &to_names(names))
    }

    /// Record include dirs and libraries `unit` provides to dependents.
    pub fn export_build_interface<I, S, L, T>(
        &mut self,
        unit: &str,
        include_dirs: I,
        libraries: L,
    ) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let strategy = self.strategy()?;
        self.resolver(strategy).export_build_interface(
            unit,
            &to_names(include_dirs),
            &to_names(libraries),
        )
    }

    // Helpers

    /// Declare interface definition files and add the dependencies their
    /// code generator needs. Discovery of those dependencies is optional.
    pub fn declare_interfaces<I, S>(
        &mut self,
        unit: &str,
        kind: InterfaceKind,
        files: I,
    ) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strategy = self.strategy()?;
        let files = to_names(files);
        if files.is_empty() {
            return Ok(());
        }

        let target = self.registry.get_mut(unit)?;
        target
            .interfaces
            .extend(files.iter().map(|file| (kind, file.clone())));

        let deps = self
            .codegen
            .get(kind)
            .cloned()
            .unwrap_or_else(|| strategy.codegen_defaults(kind));
        tracing::debug!("{}: {} {} files", unit, files.len(), kind);

        if !deps.build.is_empty() {
            self.add_build_dependencies(unit, &deps.build, DependencyOptions::default().optional())?;
        }
        self.add_run_dependencies(unit, &deps.run, DependencyOptions::default().optional())
    }

    /// Export a plugin from `unit`.
    ///
    /// All plugins of a unit share one export envelope. Each plugin file
    /// gets its own plugin manifest; declaring the same file again adds
    /// or replaces class entries.
    pub fn declare_plugin(&mut self, unit: &str, plugin: PluginDecl) -> Result<(), ResolveError> {
        let target = self.registry.get(unit)?;
        let handle = target
            .manifest_handle()
            .ok_or_else(|| ResolveError::UndefinedUnit {
                name: unit.to_string(),
            })?;

        self.assembler.write_fragment(
            handle,
            Category::ExportOpen,
            "",
            vec![EXPORT_OPEN.to_string()],
        );
        self.assembler.write_fragment(
            handle,
            Category::Export,
            format!("{}/{}", plugin.export_tag, plugin.file),
            vec![plugin_export_line(&plugin.export_tag, &plugin.file)],
        );
        self.assembler.write_fragment(
            handle,
            Category::ExportClose,
            "",
            vec![EXPORT_CLOSE.to_string()],
        );

        let doc = self.plugin_manifest_handle(unit, &plugin);
        for class in &plugin.classes {
            let lines = vec![
                xml::open(
                    1,
                    "class",
                    &[
                        ("name", class.name.as_str()),
                        ("type", class.type_name.as_str()),
                        ("base_class_type", class.base_class_type.as_str()),
                    ],
                ),
                xml::text(2, "description", &[], &class.description),
                xml::close(1, "class"),
            ];
            self.plugin_assembler
                .write_fragment(doc, Category::Entry, class.name.clone(), lines);
        }

        tracing::info!(
            "{}: plugin `{}` exports {} classes",
            unit,
            plugin.file,
            plugin.classes.len()
        );
        self.registry.get_mut(unit)?.plugins.push(plugin);
        Ok(())
    }

    fn plugin_manifest_handle(&mut self, unit: &str, plugin: &PluginDecl) -> ManifestHandle {
        if let Some(existing) = self
            .plugin_manifests
            .iter()
            .find(|m| m.unit == unit && m.file == plugin.file)
        {
            return existing.handle;
        }

        let handle = self.plugin_assembler.open(
            format!("{}/{}", unit, plugin.file),
            vec![xml::open(0, "library", &[("path", plugin.library.as_str())])],
            vec![xml::close(0, "library")],
        );
        self.plugin_manifests.push(PluginManifest {
            unit: unit.to_string(),
            file: plugin.file.clone(),
            library: plugin.library.clone(),
            handle,
        });
        handle
    }

    // Queries

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    pub fn unit(&self, name: &str) -> Result<&Unit, ResolveError> {
        self.registry.get(name)
    }

    /// Assembled manifest text of a unit.
    pub fn manifest(&self, unit: &str) -> Result<String, ResolveError> {
        let handle = self
            .registry
            .get(unit)?
            .manifest_handle()
            .ok_or_else(|| ResolveError::UndefinedUnit {
                name: unit.to_string(),
            })?;
        Ok(self.assembler.assemble(handle))
    }

    /// Manifest file name of a unit under the selected generation.
    pub fn manifest_file_name(&self, unit: &str) -> Result<&'static str, ResolveError> {
        let kind = self.registry.get(unit)?.kind();
        Ok(self.selected_strategy()?.manifest_file_name(kind))
    }

    /// Manifest file name used for host packages under the selected generation.
    pub fn host_manifest_file_name(&self) -> Result<&'static str, ResolveError> {
        Ok(self
            .selected_strategy()?
            .manifest_file_name(UnitKind::Package))
    }

    pub fn plugin_manifests(&self) -> &[PluginManifest] {
        &self.plugin_manifests
    }

    /// Assembled text of a plugin manifest.
    pub fn plugin_manifest(&self, manifest: &PluginManifest) -> String {
        self.plugin_assembler.assemble(manifest.handle)
    }

    pub fn external_mut(&mut self) -> &mut ExternalResolver {
        &mut self.external
    }

    pub fn selector(&self) -> &GenerationSelector {
        &self.selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plugin::PluginClass;
    use crate::test_support::{legacy_context, modern_context, MockHostTools};

    #[test]
    fn test_navigation_scenario() {
        let tools = MockHostTools::new()
            .with_pkg_config("boost_system", &["/usr/include"], &["boost_system"])
            .with_host_package("boost_system", "libboost-system-dev");
        let mut ctx = modern_context(tools);

        ctx.declare_package(UnitDecl::meta("nav_stack")).unwrap();
        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();
        ctx.add_build_dependencies("nav_core", ["boost_system"], DependencyOptions::default())
            .unwrap();
        ctx.add_run_dependencies("nav_core", ["nav_msgs"], DependencyOptions::default())
            .unwrap();
        ctx.declare_package(UnitDecl::package("nav_msgs")).unwrap();
        ctx.add_run_dependencies("nav_core", ["nav_msgs"], DependencyOptions::default())
            .unwrap();

        let nav_core = ctx.unit("nav_core").unwrap();
        assert_eq!(nav_core.internal_run_deps(), &["nav_msgs"]);
        assert!(nav_core.external_run_deps().is_empty());
        assert_eq!(nav_core.external_build_deps(), &["boost_system"]);

        let manifest = ctx.manifest("nav_core").unwrap();
        assert_eq!(manifest.matches("<run_depend>nav_msgs</run_depend>").count(), 1);
        assert_eq!(
            manifest.matches("<build_depend>boost_system</build_depend>").count(),
            1
        );

        let err = ctx
            .add_build_dependencies("nav_stack", ["roscpp"], DependencyOptions::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MetaBuildDependency { .. }));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut ctx = modern_context(MockHostTools::new());

        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();
        let err = ctx.declare_stack(UnitDecl::package("nav_core")).unwrap_err();

        assert_eq!(
            err,
            ResolveError::DuplicateUnit {
                name: "nav_core".to_string(),
                existing_kind: UnitKind::Package,
            }
        );
    }

    #[test]
    fn test_modern_stack_becomes_meta_package() {
        let mut ctx = modern_context(MockHostTools::new());

        ctx.declare_stack(UnitDecl::package("navigation")).unwrap();
        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();
        ctx.add_stack_dependencies("navigation", ["nav_core"]).unwrap();

        let navigation = ctx.unit("navigation").unwrap();
        assert_eq!(navigation.kind(), UnitKind::Package);
        assert!(navigation.is_meta());
        assert_eq!(navigation.internal_run_deps(), &["nav_core"]);
        assert_eq!(ctx.manifest_file_name("navigation").unwrap(), "package.xml");

        let manifest = ctx.manifest("navigation").unwrap();
        assert!(manifest.contains("<metapackage/>"));
        assert!(manifest.contains("<run_depend>nav_core</run_depend>"));
    }

    #[test]
    fn test_legacy_meta_package_becomes_stack() {
        let mut ctx = legacy_context(MockHostTools::new());

        ctx.declare_package(UnitDecl::meta("navigation")).unwrap();
        ctx.declare_stack(UnitDecl::package("common")).unwrap();
        ctx.add_run_dependencies("navigation", ["common"], DependencyOptions::default())
            .unwrap();

        let navigation = ctx.unit("navigation").unwrap();
        assert_eq!(navigation.kind(), UnitKind::Stack);
        assert_eq!(ctx.manifest_file_name("navigation").unwrap(), "stack.xml");

        let manifest = ctx.manifest("navigation").unwrap();
        assert!(manifest.starts_with("<stack>\n"));
        assert!(manifest.contains("  <depend stack=\"common\"/>\n"));
        assert!(manifest.ends_with("</stack>\n"));
    }

    #[test]
    fn test_legacy_stack_dependencies_on_package_fail() {
        let mut ctx = legacy_context(MockHostTools::new());

        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();
        let err = ctx.add_stack_dependencies("nav_core", ["common"]).unwrap_err();

        assert!(matches!(err, ResolveError::UnitKindMismatch { .. }));
    }

    #[test]
    fn test_legacy_package_depending_on_stack() {
        let tools = MockHostTools::new();
        let calls = tools.calls();
        let mut ctx = legacy_context(tools);

        ctx.declare_stack(UnitDecl::package("common")).unwrap();
        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();
        ctx.add_build_dependencies("nav_core", ["common"], DependencyOptions::default())
            .unwrap();
        ctx.add_run_dependencies("nav_core", ["common"], DependencyOptions::default())
            .unwrap();

        let nav_core = ctx.unit("nav_core").unwrap();
        assert!(nav_core.internal_build_deps().is_empty());
        assert_eq!(nav_core.internal_run_deps(), &["common"]);

        let manifest = ctx.manifest("nav_core").unwrap();
        assert_eq!(manifest.matches("<depend stack=\"common\"/>").count(), 1);
        assert!(!manifest.contains("<depend package=\"common\"/>"));
        assert_eq!(calls.count("find", "common"), 0);
    }

    #[test]
    fn test_legacy_stack_honors_filters() {
        let mut ctx = legacy_context(MockHostTools::new());

        ctx.declare_stack(UnitDecl::package("common")).unwrap();
        ctx.declare_stack(UnitDecl::package("navigation")).unwrap();
        ctx.add_run_dependencies(
            "navigation",
            ["common", "python_yaml"],
            DependencyOptions::internal_only(),
        )
        .unwrap();

        let navigation = ctx.unit("navigation").unwrap();
        assert_eq!(navigation.internal_run_deps(), &["common"]);
        assert!(navigation.external_run_deps().is_empty());
        assert!(!ctx.manifest("navigation").unwrap().contains("python_yaml"));
    }

    #[test]
    fn test_legacy_build_and_run_share_depend_element() {
        let tools = MockHostTools::new().with_unit("roscpp", "/opt/ros/roscpp", &["/opt/ros/include"], &["roscpp"]);
        let mut ctx = legacy_context(tools);

        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();
        ctx.add_build_dependencies("nav_core", ["roscpp"], DependencyOptions::default())
            .unwrap();
        ctx.add_run_dependencies("nav_core", ["roscpp"], DependencyOptions::default())
            .unwrap();

        let manifest = ctx.manifest("nav_core").unwrap();
        assert_eq!(manifest.matches("<depend package=\"roscpp\"/>").count(), 1);
        assert!(ctx
            .unit("nav_core")
            .unwrap()
            .include_dirs()
            .contains("/opt/ros/include"));
    }

    #[test]
    fn test_plugin_envelope_shared() {
        let mut ctx = modern_context(MockHostTools::new());
        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();

        for (tag, file) in [
            ("nav_core", "planners.xml"),
            ("costmap_2d", "layers.xml"),
            ("nav_core", "recovery.xml"),
        ] {
            let plugin = PluginDecl::new(tag, "lib/libnav_plugins", file).with_class(
                PluginClass::new(
                    format!("nav_core/{}", file.trim_end_matches(".xml")),
                    "nav_core::Thing",
                    "nav_core::Base",
                ),
            );
            ctx.declare_plugin("nav_core", plugin).unwrap();
        }

        let manifest = ctx.manifest("nav_core").unwrap();
        assert_eq!(manifest.matches("<export>").count(), 1);
        assert_eq!(manifest.matches("</export>").count(), 1);
        assert_eq!(manifest.matches("plugin=\"${prefix}/").count(), 3);
        assert_eq!(ctx.plugin_manifests().len(), 3);
        assert_eq!(ctx.unit("nav_core").unwrap().plugins().len(), 3);
    }

    #[test]
    fn test_plugin_manifest_text() {
        let mut ctx = modern_context(MockHostTools::new());
        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();

        let plugin = PluginDecl::new("nav_core", "lib/libcarrot_planner", "bgp_plugin.xml")
            .with_class(
                PluginClass::new(
                    "carrot_planner/CarrotPlanner",
                    "carrot_planner::CarrotPlanner",
                    "nav_core::BaseGlobalPlanner",
                )
                .with_description("A simple planner"),
            );
        ctx.declare_plugin("nav_core", plugin.clone()).unwrap();
        ctx.declare_plugin("nav_core", plugin).unwrap();

        assert_eq!(ctx.plugin_manifests().len(), 1);
        let text = ctx.plugin_manifest(&ctx.plugin_manifests()[0]);
        assert_eq!(
            text,
            "<library path=\"lib/libcarrot_planner\">\n\
             \x20 <class name=\"carrot_planner/CarrotPlanner\" type=\"carrot_planner::CarrotPlanner\" base_class_type=\"nav_core::BaseGlobalPlanner\">\n\
             \x20   <description>A simple planner</description>\n\
             \x20 </class>\n\
             </library>\n"
        );
    }

    #[test]
    fn test_interfaces_add_codegen_dependencies() {
        let tools = MockHostTools::new()
            .with_unit("message_generation", "/opt/ros/share/message_generation", &[], &[]);
        let mut ctx = modern_context(tools);

        ctx.declare_package(UnitDecl::package("nav_msgs")).unwrap();
        ctx.declare_interfaces("nav_msgs", InterfaceKind::Message, ["Path.msg", "Odometry.msg"])
            .unwrap();

        let nav_msgs = ctx.unit("nav_msgs").unwrap();
        assert_eq!(nav_msgs.interfaces().len(), 2);
        assert_eq!(nav_msgs.external_build_deps(), &["message_generation"]);
        assert_eq!(nav_msgs.external_run_deps(), &["message_runtime"]);
    }

    #[test]
    fn test_codegen_override_from_config() {
        let mut config = Config::default();
        config.distribution.name = Some("hydro".to_string());
        config.codegen.config = Some(crate::util::config::CodegenDeps {
            build: Vec::new(),
            run: vec!["dynamic_reconfigure".to_string(), "rospy".to_string()],
        });
        let mut ctx = ResolveContext::from_config(&config, Box::new(MockHostTools::new())).unwrap();

        ctx.declare_package(UnitDecl::package("move_base")).unwrap();
        ctx.declare_interfaces("move_base", InterfaceKind::Config, ["MoveBase.cfg"])
            .unwrap();

        assert_eq!(
            ctx.unit("move_base").unwrap().external_run_deps(),
            &["dynamic_reconfigure", "rospy"]
        );
    }

    #[test]
    fn test_generation_fixed_after_first_declaration() {
        let mut ctx = modern_context(MockHostTools::new());
        ctx.declare_package(UnitDecl::package("nav_core")).unwrap();

        let err = ctx
            .observe_distribution(DistributionDescriptor::new("fuerte").unwrap())
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDistributionState { .. }));
        assert_eq!(ctx.generation().unwrap(), Generation::Modern);
    }

    #[test]
    fn test_declaration_without_distribution_fails() {
        let mut ctx = ResolveContext::new(Box::new(MockHostTools::new()));
        let err = ctx.declare_package(UnitDecl::package("nav_core")).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDistributionState { .. }));
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut a = modern_context(MockHostTools::new());
        let mut b = modern_context(MockHostTools::new());

        a.declare_package(UnitDecl::package("nav_core")).unwrap();
        b.declare_package(UnitDecl::package("nav_core")).unwrap();

        assert_eq!(a.registry().len(), 1);
        assert_eq!(b.registry().len(), 1);
    }
}
