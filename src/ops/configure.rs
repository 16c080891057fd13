//! The configuration pass.
//!
//! Drives a [`ResolveContext`] through a whole description: register every
//! unit, record what each unit exports, then apply dependency declarations.

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::core::dependency::{DependencyKind, DependencyOptions};
use crate::core::distribution::{Description, UnitDescription};
use crate::core::generation::DistributionDescriptor;
use crate::core::interface::InterfaceKind;
use crate::resolver::ResolveContext;
use crate::sources::tools::HostTools;
use crate::util::config::Config;

/// Options for a configuration pass.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Distribution named on the command line
    pub distro: Option<String>,

    /// Distribution from the environment, used when neither the command
    /// line nor the description names one
    pub fallback_distro: Option<String>,
}

/// Run the configuration pass over `description`.
pub fn configure(
    description: &Description,
    config: &Config,
    tools: Box<dyn HostTools>,
    options: &ConfigureOptions,
) -> Result<ResolveContext> {
    let mut ctx = ResolveContext::from_config(config, tools)?;
    if let Some(descriptor) = select_distribution(description, config, options)? {
        tracing::debug!("distribution {}", descriptor);
        ctx.observe_distribution(descriptor)?;
    }

    for unit in &description.units {
        let decl = unit.to_decl();
        let declared = if unit.stack {
            ctx.declare_stack(decl)
        } else {
            ctx.declare_package(decl)
        };
        declared.with_context(|| format!("failed to declare `{}`", unit.name))?;
    }

    for unit in &description.units {
        if !unit.include_dirs.is_empty() || !unit.libraries.is_empty() {
            ctx.export_build_interface(&unit.name, &unit.include_dirs, &unit.libraries)?;
        }
    }

    for index in application_order(description) {
        let unit = &description.units[index];
        apply_dependencies(&mut ctx, unit)
            .with_context(|| format!("failed to configure `{}`", unit.name))?;
    }

    Ok(ctx)
}

/// Pick the distribution descriptor by precedence: command line, then the
/// description, then the environment. `None` leaves the config's choice.
fn select_distribution(
    description: &Description,
    config: &Config,
    options: &ConfigureOptions,
) -> Result<Option<DistributionDescriptor>> {
    let name = options
        .distro
        .as_deref()
        .or(description.distribution.name.as_deref())
        .or(options.fallback_distro.as_deref());
    let Some(name) = name else {
        return Ok(None);
    };

    let mut descriptor = DistributionDescriptor::new(name)?;
    if let Some(generation) = description
        .distribution
        .generation
        .or(config.distribution.generation)
    {
        descriptor = descriptor.with_generation(generation);
    }
    Ok(Some(descriptor))
}

/// File order, with each unit's described build dependencies first.
fn application_order(description: &Description) -> Vec<usize> {
    fn visit(
        description: &Description,
        index: usize,
        visited: &mut HashSet<usize>,
        order: &mut Vec<usize>,
    ) {
        if !visited.insert(index) {
            return;
        }
        for dep in &description.units[index].build_depends {
            if let Some(dep_index) = description.units.iter().position(|u| &u.name == dep) {
                visit(description, dep_index, visited, order);
            }
        }
        order.push(index);
    }

    let mut visited = HashSet::new();
    let mut order = Vec::with_capacity(description.units.len());
    for index in 0..description.units.len() {
        visit(description, index, &mut visited, &mut order);
    }
    order
}

fn apply_dependencies(ctx: &mut ResolveContext, unit: &UnitDescription) -> Result<()> {
    let name = unit.name.as_str();

    if !unit.build_depends.is_empty() {
        ctx.add_build_dependencies(name, &unit.build_depends, DependencyOptions::default())?;
    }
    if !unit.optional_build_depends.is_empty() {
        ctx.add_build_dependencies(
            name,
            &unit.optional_build_depends,
            DependencyOptions::default().optional(),
        )?;
    }
    if !unit.run_depends.is_empty() {
        ctx.add_run_dependencies(name, &unit.run_depends, DependencyOptions::default())?;
    }
    if !unit.stack_depends.is_empty() {
        ctx.add_stack_dependencies(name, &unit.stack_depends)?;
    }
    if !unit.extra_build_depends.is_empty() {
        ctx.add_extra_dependencies(name, DependencyKind::Build, &unit.extra_build_depends)?;
    }
    if !unit.extra_run_depends.is_empty() {
        ctx.add_extra_dependencies(name, DependencyKind::Run, &unit.extra_run_depends)?;
    }

    ctx.declare_interfaces(name, InterfaceKind::Message, &unit.messages)?;
    ctx.declare_interfaces(name, InterfaceKind::Service, &unit.services)?;
    ctx.declare_interfaces(name, InterfaceKind::Config, &unit.configs)?;

    for plugin in &unit.plugins {
        ctx.declare_plugin(name, plugin.clone())?;
    }

    Ok(())
}
