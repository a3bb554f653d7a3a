//! Stage 1: Enumeration
//!
//! Lists every repository of the organization and persists the URLs as the
//! `full` checkpoint. The checkpoint is written only after the listing has
//! completed; when any page request fails, a previously written `full` list is
//! left exactly as it was.

use log::info;

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::error::Result;
use crate::github::{list_all_repositories, RepositoryLister};

/// Execute Stage 1: list the organization and write the `full` checkpoint.
pub fn execute(
    lister: &dyn RepositoryLister,
    organization: &str,
    store: &CheckpointStore,
) -> Result<Vec<String>> {
    info!("Listing repositories of '{}'", organization);
    let full = list_all_repositories(lister, organization)?;
    store.write_list(Checkpoint::Full, &full)?;
    info!(
        "Wrote {} repositories to {}",
        full.len(),
        store.path(Checkpoint::Full).display()
    );
    Ok(full)
}
