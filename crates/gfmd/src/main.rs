//! gfmd CLI - diagram regions in markdown rendered as Kroki image links.
//!
//! Provides commands for:
//! - `render`: Rewrite diagram regions in markdown files
//! - `link`: Print the Kroki link for a diagram source
//! - `decode`: Print the diagram source carried by a Kroki link

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DecodeArgs, LinkArgs, RenderArgs};
use output::Output;

/// gfmd - diagrams for GitHub-flavored markdown.
#[derive(Parser)]
#[command(name = "gfmd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite diagram regions in markdown files.
    Render(RenderArgs),
    /// Print the Kroki image link for a diagram source.
    Link(LinkArgs),
    /// Print the diagram source encoded in a Kroki link.
    Decode(DecodeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
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
        Commands::Render(args) => args.execute(),
        Commands::Link(args) => args.execute(),
        Commands::Decode(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
