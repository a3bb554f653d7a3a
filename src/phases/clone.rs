//! Stage 3: Cloning
//!
//! Clones every repository in the `selected` checkpoint into
//! `<repos_dir>/<name>`, where `<name>` is the text after the last `/` of the
//! URL. Repositories are cloned one at a time, in list order.
//!
//! ## Failure Isolation
//!
//! A failed clone (network, authentication, destination already present) is
//! logged and recorded, and the stage moves on to the next repository. It never
//! retries and never removes an existing directory. Two URLs that would share
//! one directory name are detected up front: the first keeps the name, later
//! ones are recorded as collisions and not cloned.
//!
//! The outcome of every repository is returned as a [`CloneReport`] and
//! persisted as the `clone-report` checkpoint.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::error::{Error, Result};
use crate::repository::{directory_name, GitOperations};

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloneStatus {
    Cloned,
    Failed { message: String },
    /// Not attempted: an earlier URL in the batch already uses the directory.
    Collision { existing_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOutcome {
    pub url: String,
    /// Target directory, absent when no name could be derived from the URL.
    pub directory: Option<PathBuf>,
    #[serde(flatten)]
    pub status: CloneStatus,
}

impl CloneOutcome {
    pub fn is_success(&self) -> bool {
        self.status == CloneStatus::Cloned
    }
}

/// Per-repository outcomes of one clone stage, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneReport {
    pub outcomes: Vec<CloneOutcome>,
}

impl CloneReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn cloned(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CloneOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

/// Clone each URL into `target_root`, isolating failures per repository.
///
/// Only failing to create `target_root` itself is an error.
pub fn clone_all<S: AsRef<str>>(
    git: &dyn GitOperations,
    urls: &[S],
    target_root: &Path,
) -> Result<CloneReport> {
    fs::create_dir_all(target_root)?;

    let mut report = CloneReport::default();
    let mut claimed: HashMap<String, String> = HashMap::new();
    let total = urls.len();

    for (index, url) in urls.iter().enumerate() {
        let url = url.as_ref();

        let Some(name) = directory_name(url) else {
            warn!("Skipping {}: cannot derive a directory name", url);
            report.outcomes.push(CloneOutcome {
                url: url.to_string(),
                directory: None,
                status: CloneStatus::Failed {
                    message: "cannot derive a directory name from the URL".to_string(),
                },
            });
            continue;
        };
        let directory = target_root.join(name);

        if let Some(existing) = claimed.get(name) {
            let err = Error::NameCollision {
                name: name.to_string(),
                first: existing.clone(),
                second: url.to_string(),
            };
            warn!("Skipping clone: {}", err);
            report.outcomes.push(CloneOutcome {
                url: url.to_string(),
                directory: Some(directory),
                status: CloneStatus::Collision {
                    existing_url: existing.clone(),
                },
            });
            continue;
        }
        claimed.insert(name.to_string(), url.to_string());

        info!(
            "[{}/{}] Cloning {} to {}",
            index + 1,
            total,
            url,
            directory.display()
        );
        let status = match git.clone_repository(url, &directory) {
            Ok(()) => CloneStatus::Cloned,
            Err(e) => {
                warn!("Clone failed, continuing with the next repository: {}", e);
                CloneStatus::Failed {
                    message: e.to_string(),
                }
            }
        };

        report.outcomes.push(CloneOutcome {
            url: url.to_string(),
            directory: Some(directory),
            status,
        });
    }

    info!(
        "Cloned {} of {} repositories ({} failed)",
        report.cloned(),
        report.attempted(),
        report.failed()
    );
    Ok(report)
}

/// Execute Stage 3: clone `selected` into `repos_dir` and persist the report.
pub fn execute(
    git: &dyn GitOperations,
    store: &CheckpointStore,
    repos_dir: &Path,
) -> Result<CloneReport> {
    let selected = store.read_list(Checkpoint::Selected)?;
    let report = clone_all(git, &selected, repos_dir)?;
    store.write(Checkpoint::CloneReport, &report)?;
    Ok(report)
}
