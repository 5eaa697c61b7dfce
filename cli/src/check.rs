#![deny(missing_docs)]

//! # Check Command
//!
//! Runs the generated-code sanity checks against a server file.

use std::fs;
use std::path::PathBuf;

use oas2mcp_core::strategies::ServerStrategy;
use oas2mcp_core::{check_generated, CheckOutcome};
use tracing::info;

use crate::error::CliResult;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Generated server source to inspect.
    #[clap(long)]
    pub server_file: PathBuf,
}

/// Executes the checks. Missing patterns are logged; only unbalanced
/// delimiters or an unreadable file fail the command.
pub fn execute(args: &CheckArgs, strategy: &impl ServerStrategy) -> CliResult<Vec<CheckOutcome>> {
    let code = fs::read_to_string(&args.server_file)?;
    let outcomes = check_generated(&code, strategy)?;
    let passed = outcomes.iter().filter(|o| o.passed).count();
    info!(
        path = %args.server_file.display(),
        passed,
        total = outcomes.len(),
        "Checks finished"
    );
    Ok(outcomes)
}
