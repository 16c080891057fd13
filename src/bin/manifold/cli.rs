//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use manifold::util::shell::ColorChoice;

/// Manifold - dependency resolver and manifest assembler for multi-unit distributions
#[derive(Parser)]
#[command(name = "manifold")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Format of status messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Target distribution (overrides Distribution.toml)
    #[arg(long, global = true)]
    pub distro: Option<String>,

    /// Distribution used when neither --distro nor Distribution.toml names one
    #[arg(long, global = true, env = "MANIFOLD_DISTRO", hide = true)]
    pub fallback_distro: Option<String>,

    /// Path to Distribution.toml
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve all units and write their manifests
    Configure(ConfigureArgs),

    /// Print the assembled manifest of a unit
    Manifest(ManifestArgs),

    /// Show the accumulated dependencies and build environment of a unit
    Deps(DepsArgs),

    /// List packaging dependencies of every unit
    Package(PackageArgs),

    /// Show the build graph of generated files
    Graph(GraphArgs),

    /// Check that the host lookup tools are installed
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Output directory (defaults to .manifold/manifests next to Distribution.toml)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Resolve without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Unit name
    pub unit: String,

    /// Print the plugin manifest with this file name instead
    #[arg(long)]
    pub plugin: Option<String>,
}

#[derive(Args)]
pub struct DepsArgs {
    /// Unit name
    pub unit: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PackageArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DoctorArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
