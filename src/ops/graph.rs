//! Build graph of generated files.
//!
//! One target per unit manifest and one per plugin manifest. A unit's
//! manifest target depends on the manifest targets of its internal build
//! dependencies; a plugin manifest depends on its unit's manifest.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::resolver::{ResolveContext, ResolveError};

/// What a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Manifest,
    PluginManifest,
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    pub name: String,
    pub unit: String,
    pub kind: TargetKind,
    /// Output path relative to the output directory
    pub output: PathBuf,
    pub depends: Vec<String>,
}

/// Targets in dependency order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildGraph {
    pub targets: Vec<BuildTarget>,
}

impl BuildGraph {
    pub fn target(&self, name: &str) -> Option<&BuildTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Name of the manifest target of `unit`.
pub fn manifest_target_name(unit: &str) -> String {
    format!("{}_manifest", unit)
}

fn plugin_target_name(unit: &str, file: &str) -> String {
    let stem = file.strip_suffix(".xml").unwrap_or(file);
    format!("{}_plugin_{}", unit, stem.replace(['/', '.'], "_"))
}

/// Build the target graph of a configured context.
pub fn build_graph(ctx: &ResolveContext) -> Result<BuildGraph> {
    let mut graph: DiGraph<BuildTarget, ()> = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    for unit in ctx.registry().iter() {
        let file = ctx.manifest_file_name(unit.name())?;
        let depends: Vec<String> = unit
            .internal_build_deps()
            .iter()
            .map(manifest_target_name)
            .collect();
        let target = BuildTarget {
            name: manifest_target_name(unit.name()),
            unit: unit.name().to_string(),
            kind: TargetKind::Manifest,
            output: PathBuf::from(unit.name()).join(file),
            depends,
        };
        let node = graph.add_node(target);
        nodes.insert(manifest_target_name(unit.name()), node);
    }

    for manifest in ctx.plugin_manifests() {
        let target = BuildTarget {
            name: plugin_target_name(&manifest.unit, &manifest.file),
            unit: manifest.unit.clone(),
            kind: TargetKind::PluginManifest,
            output: PathBuf::from(&manifest.unit).join(&manifest.file),
            depends: vec![manifest_target_name(&manifest.unit)],
        };
        let name = target.name.clone();
        let node = graph.add_node(target);
        nodes.insert(name, node);
    }

    // Edges run from a dependency to its dependent.
    let mut edges = Vec::new();
    for node in graph.node_indices() {
        for dep in &graph[node].depends {
            if let Some(&dep_node) = nodes.get(dep) {
                edges.push((dep_node, node));
            }
        }
    }
    for (from, to) in edges {
        if !graph.contains_edge(from, to) {
            graph.add_edge(from, to, ());
        }
    }

    let order = toposort(&graph, None).map_err(|_| ResolveError::DependencyCycle {
        units: cycle_units(&graph),
    })?;

    Ok(BuildGraph {
        targets: order.into_iter().map(|node| graph[node].clone()).collect(),
    })
}

/// Units on some cycle, sorted.
fn cycle_units(graph: &DiGraph<BuildTarget, ()>) -> Vec<String> {
    let mut units: Vec<String> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .flatten()
        .map(|node| graph[node].unit.clone())
        .collect();
    units.sort();
    units.dedup();
    units
}

/// Render the graph as plain text.
pub fn format_graph(graph: &BuildGraph) -> String {
    let mut output = String::new();
    for target in &graph.targets {
        output.push_str(&format!("{} -> {}\n", target.name, target.output.display()));
        for dep in &target.depends {
            output.push_str(&format!("  after {}\n", dep));
        }
    }
    output
}
