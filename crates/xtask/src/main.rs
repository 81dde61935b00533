//! Development tasks for sheet list files
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod config;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Keys, Normalize, Points};

/// Development tasks for sheet list files
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for character sheet lists", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Show the computed point cost of every trait in a list
    Points(Points),

    /// Load a file and save it back in the current format
    Normalize(Normalize),

    /// List or substitute nameable `@key@` placeholders
    Keys(Keys),

    /// Validate that files load
    Check(Check),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SHEET_* settings)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Points(cmd) => cmd.execute(),
        Command::Normalize(cmd) => cmd.execute(),
        Command::Keys(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
    }
}
