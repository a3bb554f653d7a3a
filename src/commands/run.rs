//! Run command implementation
//!
//! The run command executes every stage in order:
//! 1. Listing the organization's repositories
//! 2. Filtering them with the partition pattern
//! 3. Cloning the selected repositories
//! 4. Archiving the clones (unless `--no-archive` or `archive: false`)

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use repo_harvest::config::ConfigLayer;
use repo_harvest::output::{archive_summary, clone_summary, emoji, OutputConfig};
use repo_harvest::phases::orchestrator::Pipeline;

use super::print_lines;
use crate::cli::SettingsArgs;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stop after cloning; do not build archives
    #[arg(long)]
    pub no_archive: bool,

    /// Compression level from 0 (stored, no compression) to 9 (smallest, default)
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,
}

/// Execute the run command
pub fn execute(args: RunArgs, settings: &SettingsArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let config = settings.load()?.apply(ConfigLayer {
        archive: args.no_archive.then_some(false),
        compression_level: args.compression_level,
        ..Default::default()
    });
    let pipeline = Pipeline::new(config)?;

    let summary = pipeline.run()?;

    println!(
        "{} Listed {} repositories, selected {} ({} left over)",
        emoji(output, "🔍", "[LIST]"),
        summary.listed,
        summary.selected,
        summary.leftover
    );
    print_lines(clone_summary(output, &summary.clone));
    if let Some(archive) = &summary.archive {
        print_lines(archive_summary(output, archive));
    }
    println!(
        "Finished in {:.2}s with {} failed repositories",
        start_time.elapsed().as_secs_f64(),
        summary.failed()
    );
    Ok(())
}
