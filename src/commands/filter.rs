//! Filter command implementation
//!
//! Runs stage 2 only: reads the `full` checkpoint and writes the `selected`
//! and `leftover` checkpoints. Needs no network access.

use anyhow::Result;
use clap::Args;
use repo_harvest::output::{status_marker, OutputConfig};
use repo_harvest::phases::orchestrator::Pipeline;

use crate::cli::SettingsArgs;

/// Arguments for the filter command
#[derive(Args, Debug)]
pub struct FilterArgs {}

/// Execute the filter command
pub fn execute(_args: FilterArgs, settings: &SettingsArgs, output: &OutputConfig) -> Result<()> {
    let config = settings.load()?;
    let pipeline = Pipeline::new(config)?;

    let partition = pipeline.filter()?;

    println!(
        "{} Selected {} of {} repositories ({} left over)",
        status_marker(output, true),
        partition.selected.len(),
        partition.total(),
        partition.leftover.len()
    );
    Ok(())
}
