//! Stage 4: Archiving
//!
//! Produces `<archives_dir>/<name>.zip` for every directory directly under the
//! repos directory, with the directory's contents at the archive root. The
//! `.gitkeep` placeholder and plain files in the repos directory are ignored.
//! Directories are processed one at a time in name order.
//!
//! A repository whose archive cannot be built is logged and recorded in the
//! [`ArchiveReport`]; the remaining repositories are still archived. Existing
//! archives with the same name are replaced.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::archive::ArchiveWriter;
use crate::defaults::PLACEHOLDER;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArchiveStatus {
    Archived {
        files: usize,
        /// Files that vanished while packing and were left out.
        skipped: usize,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOutcome {
    /// Name of the repository directory.
    pub name: String,
    pub archive: PathBuf,
    #[serde(flatten)]
    pub status: ArchiveStatus,
}

impl ArchiveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ArchiveStatus::Archived { .. })
    }
}

/// Per-directory outcomes of one archive stage, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub outcomes: Vec<ArchiveOutcome>,
}

impl ArchiveReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn archived(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArchiveOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

/// Directories directly under `repos_root` that hold a cloned repository,
/// sorted by name. Symlinks to directories count as directories.
pub fn repository_directories(repos_root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(repos_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == PLACEHOLDER {
            continue;
        }
        // Follows symlinks, so a linked clone is archived like a real one
        let path = entry.path();
        if !path.is_dir() {
            debug!("Skipping {}: not a directory", path.display());
            continue;
        }
        dirs.push((name, path));
    }
    dirs.sort();
    Ok(dirs)
}

/// Archive every repository directory under `repos_root` into `archives_dir`.
///
/// Failing to read `repos_root` or to create `archives_dir` is an error;
/// failures of individual archives are recorded in the report.
pub fn archive_all(
    writer: &dyn ArchiveWriter,
    repos_root: &Path,
    archives_dir: &Path,
    compression_level: u8,
) -> Result<ArchiveReport> {
    let dirs = repository_directories(repos_root)?;
    fs::create_dir_all(archives_dir)?;

    let mut report = ArchiveReport::default();
    let total = dirs.len();

    for (index, (name, source)) in dirs.into_iter().enumerate() {
        let archive = archives_dir.join(format!("{}.zip", name));
        info!(
            "[{}/{}] Archiving {} to {}",
            index + 1,
            total,
            source.display(),
            archive.display()
        );

        let status = match writer.create_archive(&source, &archive, compression_level) {
            Ok(stats) => ArchiveStatus::Archived {
                files: stats.files,
                skipped: stats.skipped.len(),
            },
            Err(e) => {
                warn!("Archive failed, continuing with the next repository: {}", e);
                ArchiveStatus::Failed {
                    message: e.to_string(),
                }
            }
        };

        report.outcomes.push(ArchiveOutcome {
            name,
            archive,
            status,
        });
    }

    info!(
        "Archived {} of {} repositories ({} failed)",
        report.archived(),
        report.attempted(),
        report.failed()
    );
    Ok(report)
}

/// Execute Stage 4: archive the contents of `repos_dir`.
pub fn execute(
    writer: &dyn ArchiveWriter,
    repos_dir: &Path,
    archives_dir: &Path,
    compression_level: u8,
) -> Result<ArchiveReport> {
    archive_all(writer, repos_dir, archives_dir, compression_level)
}
