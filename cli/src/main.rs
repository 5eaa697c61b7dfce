#![deny(missing_docs)]

//! # oas2mcp CLI
//!
//! Command Line Interface for the OpenAPI to MCP server generator.
//!
//! Supported Commands:
//! - `generate`: OpenAPI document -> MCP server source + llms.txt.
//! - `check`: Sanity checks over a generated server file.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oas2mcp_core::strategies::RmcpStrategy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliResult;

mod check;
mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(name = "oas2mcp", author, version, about = "Generate MCP servers from OpenAPI documents")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an MCP server from an OpenAPI document.
    Generate(generate::GenerateArgs),
    /// Check a generated server file for expected structure.
    Check(check::CheckArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "oas2mcp=debug" } else { "oas2mcp=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> CliResult<()> {
    // Injecting the rmcp strategy
    let strategy = RmcpStrategy;
    match &cli.command {
        Commands::Generate(args) => {
            generate::execute(args, &strategy)?;
        }
        Commands::Check(args) => {
            check::execute(args, &strategy)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
