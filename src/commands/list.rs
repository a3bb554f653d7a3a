//! List command implementation
//!
//! Runs stage 1 only: pages through the organization's repositories and
//! writes the `full` checkpoint.

use anyhow::Result;
use clap::Args;
use repo_harvest::checkpoint::Checkpoint;
use repo_harvest::output::{status_marker, OutputConfig};
use repo_harvest::phases::orchestrator::Pipeline;

use crate::cli::SettingsArgs;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Execute the list command
pub fn execute(_args: ListArgs, settings: &SettingsArgs, output: &OutputConfig) -> Result<()> {
    let config = settings.load()?;
    let pipeline = Pipeline::new(config)?;

    let full = pipeline.enumerate()?;

    println!(
        "{} Listed {} repositories into {}",
        status_marker(output, true),
        full.len(),
        pipeline.store().path(Checkpoint::Full).display()
    );
    Ok(())
}
