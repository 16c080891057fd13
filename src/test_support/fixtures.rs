//! Test fixtures for common test scenarios.
//!
//! Contexts pinned to one distribution of each generation, plus sample
//! description files.

use crate::core::generation::DistributionDescriptor;
use crate::resolver::ResolveContext;

use super::MockHostTools;

/// Distribution used for legacy-schema tests.
pub const LEGACY_DISTRO: &str = "fuerte";

/// Distribution used for modern-schema tests.
pub const MODERN_DISTRO: &str = "hydro";

/// A context with the legacy schema already selected.
pub fn legacy_context(tools: MockHostTools) -> ResolveContext {
    context_for(LEGACY_DISTRO, tools)
}

/// A context with the modern schema already selected.
pub fn modern_context(tools: MockHostTools) -> ResolveContext {
    context_for(MODERN_DISTRO, tools)
}

fn context_for(distro: &str, tools: MockHostTools) -> ResolveContext {
    let descriptor = DistributionDescriptor::new(distro).unwrap();
    let mut ctx = ResolveContext::new(Box::new(tools));
    ctx.observe_distribution(descriptor).unwrap();
    ctx.generation().unwrap();
    ctx
}

/// A modern distribution with a meta-package, forward references and a plugin.
pub const NAVIGATION_DESCRIPTION: &str = r#"
[distribution]
name = "hydro"

[[unit]]
name = "navigation"
meta = true
run_depends = ["nav_core", "nav_msgs"]

[[unit]]
name = "nav_core"
version = "1.2.0"
license = "BSD"
maintainer = { name = "Ada", email = "ada@example.com" }
include_dirs = ["include"]
libraries = ["nav_core"]
build_depends = ["nav_msgs"]
run_depends = ["nav_msgs"]
extra_run_depends = ["python-yaml"]

[[unit]]
name = "nav_msgs"
messages = ["Path.msg", "Goal.msg"]
include_dirs = ["msg_gen/cpp/include"]

[[unit]]
name = "nav_plugins"
build_depends = ["nav_core"]

[[unit.plugin]]
type = "nav_core"
library = "lib/libnav_plugins"
file = "nav_plugins.xml"

[[unit.plugin.class]]
name = "nav_plugins/Grid"
type = "nav_plugins::Grid"
base_class_type = "nav_core::Planner"
description = "Grid planner."
"#;

/// A legacy distribution with two stacks.
pub const STACKS_DESCRIPTION: &str = r#"
[distribution]
name = "fuerte"

[[unit]]
name = "common"
stack = true

[[unit]]
name = "navigation"
stack = true
stack_depends = ["common"]

[[unit]]
name = "nav_core"
build_depends = ["nav_util"]

[[unit]]
name = "nav_util"
include_dirs = ["include"]
"#;
