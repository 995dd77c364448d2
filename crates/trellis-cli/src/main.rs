//! Trellis CLI - Build RDF graphs from rows and templates.

use clap::Parser;
use trellis_cli::commands;
use trellis_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> trellis_cli::Result<()> {
    let cli = Cli::parse();

    // Log to stderr so stdout stays clean for graph output
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Validate(args) => commands::execute_validate(args, &formatter)?,
        Command::Expand(args) => commands::execute_expand(args, &formatter)?,
        Command::Query(args) => commands::execute_query(args, &formatter)?,
    }

    Ok(())
}
