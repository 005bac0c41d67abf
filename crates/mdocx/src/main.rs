//! mdocx CLI - Markdown to Word converter.
//!
//! Provides commands for:
//! - `render`: Convert a markdown file into a Flat OPC Word document
//! - `ops`: Print the document builder operations for a markdown file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{OpsArgs, RenderArgs};
use output::Output;

/// mdocx - Markdown to Word converter.
#[derive(Parser)]
#[command(name = "mdocx", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file into a Word document.
    Render(RenderArgs),
    /// Print the builder operations for a markdown file.
    Ops(OpsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Render(args) => args.source.verbose,
        Commands::Ops(args) => args.source.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Ops(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
