//! # Repo Harvest CLI
//!
//! This is the binary entry point for the `repo-harvest` command-line tool.
//!
//! Its primary responsibilities are:
//! - Loading a `.env` file from the working directory, if present.
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The pipeline itself lives in the `repo_harvest` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // A missing .env file is the normal case
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();
    cli.execute()
}
