//! Clone command implementation
//!
//! Runs stage 3 only: clones every repository in the `selected` checkpoint.
//! Individual clone failures are summarized but do not fail the command.

use anyhow::Result;
use clap::Args;
use repo_harvest::output::{clone_summary, OutputConfig};
use repo_harvest::phases::orchestrator::Pipeline;

use super::print_lines;
use crate::cli::SettingsArgs;

/// Arguments for the clone command
#[derive(Args, Debug)]
pub struct CloneArgs {}

/// Execute the clone command
pub fn execute(_args: CloneArgs, settings: &SettingsArgs, output: &OutputConfig) -> Result<()> {
    let config = settings.load()?;
    let pipeline = Pipeline::new(config)?;

    let report = pipeline.clone_selected()?;

    print_lines(clone_summary(output, &report));
    Ok(())
}
