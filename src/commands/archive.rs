//! Archive command implementation
//!
//! Runs stage 4 only: zips every directory under the repos directory into the
//! archives directory. Individual archive failures are summarized but do not
//! fail the command.

use anyhow::Result;
use clap::Args;
use repo_harvest::config::ConfigLayer;
use repo_harvest::output::{archive_summary, OutputConfig};
use repo_harvest::phases::orchestrator::Pipeline;

use super::print_lines;
use crate::cli::SettingsArgs;

/// Arguments for the archive command
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Compression level from 0 (stored, no compression) to 9 (smallest, default)
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,
}

/// Execute the archive command
pub fn execute(args: ArchiveArgs, settings: &SettingsArgs, output: &OutputConfig) -> Result<()> {
    let config = settings.load()?.apply(ConfigLayer {
        compression_level: args.compression_level,
        ..Default::default()
    });
    let pipeline = Pipeline::new(config)?;

    let report = pipeline.archive()?;

    print_lines(archive_summary(output, &report));
    Ok(())
}
