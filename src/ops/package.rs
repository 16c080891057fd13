//! Packaging-time dependency listing.
//!
//! Internal dependencies are listed by unit name. External dependencies are
//! mapped to the host packages that provide them; a dependency no host
//! package provides is fatal.

use anyhow::Result;
use serde::Serialize;

use crate::core::unit::Unit;
use crate::resolver::{ResolveContext, ResolveError};

/// Dependencies of one unit as a packager needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageDependencies {
    pub unit: String,
    pub build: Vec<String>,
    pub run: Vec<String>,
}

/// List packaging dependencies of every unit, in registration order.
pub fn package_dependencies(ctx: &mut ResolveContext) -> Result<Vec<PackageDependencies>> {
    let manifest_file = ctx.host_manifest_file_name()?;
    let units: Vec<Unit> = ctx.registry().iter().cloned().collect();

    let mut listing = Vec::with_capacity(units.len());
    for unit in &units {
        let build = dependency_list(
            ctx,
            unit,
            unit.internal_build_deps().iter(),
            unit.external_build_deps().iter(),
            unit.extra_build_deps().iter(),
            manifest_file,
        )?;
        let run = dependency_list(
            ctx,
            unit,
            unit.internal_run_deps().iter(),
            unit.external_run_deps().iter(),
            unit.extra_run_deps().iter(),
            manifest_file,
        )?;

        listing.push(PackageDependencies {
            unit: unit.name().to_string(),
            build,
            run,
        });
    }

    Ok(listing)
}

fn dependency_list<'a>(
    ctx: &mut ResolveContext,
    unit: &Unit,
    internal: impl Iterator<Item = &'a str>,
    external: impl Iterator<Item = &'a str>,
    extra: impl Iterator<Item = &'a str>,
    manifest_file: &str,
) -> Result<Vec<String>> {
    let mut deps: Vec<String> = internal.map(str::to_string).collect();

    for name in external {
        let package = ctx
            .external_mut()
            .resolve_host_package(name, manifest_file)
            .ok_or_else(|| ResolveError::UnresolvedHostPackage {
                unit: unit.name().to_string(),
                dependency: name.to_string(),
            })?;
        if !deps.contains(&package) {
            deps.push(package);
        }
    }

    for name in extra {
        if !deps.iter().any(|d| d == name) {
            deps.push(name.to_string());
        }
    }

    Ok(deps)
}

/// Render a listing as plain text, one unit per block.
pub fn format_listing(listing: &[PackageDependencies]) -> String {
    let mut output = String::new();
    for entry in listing {
        output.push_str(&format!("{}\n", entry.unit));
        output.push_str(&format!("  build: {}\n", entry.build.join(", ")));
        output.push_str(&format!("  run:   {}\n", entry.run.join(", ")));
    }
    output
}
