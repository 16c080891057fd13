//! Manifold CLI - dependency resolver and manifest assembler

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use manifold::util::context::DescriptionError;
use manifold::util::diagnostic;
use manifold::util::Shell;
use manifold::ResolveError;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.global.verbose {
        EnvFilter::new("manifold=debug")
    } else if cli.global.quiet {
        EnvFilter::new("manifold=error")
    } else {
        EnvFilter::new("manifold=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Arc::new(Shell::from_flags(
        cli.global.quiet,
        cli.global.verbose,
        cli.global.color,
        cli.global.message_format == MessageFormat::Json,
    ));

    if let Err(e) = run(cli, &shell) {
        report(&e, &shell);
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Arc<Shell>) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args, &global, shell),
        Commands::Manifest(args) => commands::manifest::execute(args, &global),
        Commands::Deps(args) => commands::deps::execute(args, &global),
        Commands::Package(args) => commands::package::execute(args, &global),
        Commands::Graph(args) => commands::graph::execute(args, &global),
        Commands::Doctor(args) => commands::doctor::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Resolution and lookup errors get a full diagnostic; anything else prints its chain.
fn report(e: &anyhow::Error, shell: &Shell) {
    match e.downcast_ref::<ResolveError>() {
        Some(err) if !shell.is_json() => {
            if e.chain().count() > 1 {
                shell.note(format!("{}", e));
            }
            diagnostic::emit(&err.to_diagnostic(), shell.use_color());
        }
        _ => match e.downcast_ref::<DescriptionError>() {
            Some(err) if !shell.is_json() => {
                diagnostic::emit(&err.to_diagnostic(), shell.use_color())
            }
            _ => shell.error(format!("{:#}", e)),
        },
    }
}
