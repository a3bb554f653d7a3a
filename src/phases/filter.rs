//! Stage 2: Filtering
//!
//! Reads the `full` checkpoint, splits it with the partition pattern and writes
//! the `selected` and `leftover` checkpoints.

use log::info;
use regex::Regex;

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::error::Result;
use crate::partition::{partition, Partition};

/// Execute Stage 2: partition `full` into `selected` and `leftover`.
pub fn execute(store: &CheckpointStore, pattern: &Regex) -> Result<Partition> {
    let full = store.read_list(Checkpoint::Full)?;
    info!("Total number of repositories: {}", full.len());

    let result = partition(&full, pattern);
    info!(
        "Pattern '{}' selected {} repositories ({} left over)",
        pattern.as_str(),
        result.selected.len(),
        result.leftover.len()
    );

    store.write_list(Checkpoint::Selected, &result.selected)?;
    store.write_list(Checkpoint::Leftover, &result.leftover)?;
    Ok(result)
}
