//! # Checkpoint Store
//!
//! Stages never hand data to each other in memory. Each one writes its output
//! as a JSON document under the lists directory and the next one reads it back,
//! so any stage can be re-run on its own from the last written checkpoint.
//!
//! Writes replace the whole file. Reads distinguish "never written"
//! ([`Error::CheckpointMissing`]) from "written but unreadable"
//! ([`Error::CheckpointCorrupt`]).

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// The named checkpoints persisted between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Every repository of the organization, in listing order.
    Full,
    /// Repositories whose URL matches the partition pattern.
    Selected,
    /// Repositories whose URL does not match.
    Leftover,
    /// Per-repository outcome of the last clone stage.
    CloneReport,
}

impl Checkpoint {
    /// Logical key used in log lines and error messages.
    pub fn key(self) -> &'static str {
        match self {
            Checkpoint::Full => "full",
            Checkpoint::Selected => "selected",
            Checkpoint::Leftover => "leftover",
            Checkpoint::CloneReport => "clone-report",
        }
    }

    /// File name inside the lists directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Checkpoint::Full => "fullList.json",
            Checkpoint::Selected => "filteredList.json",
            Checkpoint::Leftover => "leftoverList.json",
            Checkpoint::CloneReport => "cloneReport.json",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// File-backed store for [`Checkpoint`] documents.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    root: PathBuf,
}

impl CheckpointStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of a checkpoint on disk.
    pub fn path(&self, checkpoint: Checkpoint) -> PathBuf {
        self.root.join(checkpoint.file_name())
    }

    /// Whether the checkpoint has been written.
    pub fn exists(&self, checkpoint: Checkpoint) -> bool {
        self.path(checkpoint).is_file()
    }

    /// Serialize `value` and overwrite the checkpoint with it.
    pub fn write<T>(&self, checkpoint: Checkpoint, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        fs::create_dir_all(&self.root)?;
        let path = self.path(checkpoint);
        let json = serde_json::to_string(value)?;
        fs::write(&path, json)?;
        debug!("Checkpoint '{}' written to {}", checkpoint, path.display());
        Ok(())
    }

    /// Read and deserialize a checkpoint.
    pub fn read<T>(&self, checkpoint: Checkpoint) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = self.path(checkpoint);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::CheckpointMissing {
                    key: checkpoint.key().to_string(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw).map_err(|e| Error::CheckpointCorrupt {
            key: checkpoint.key().to_string(),
            path,
            message: e.to_string(),
        })
    }

    /// Overwrite a repository list checkpoint.
    pub fn write_list(&self, checkpoint: Checkpoint, urls: &[String]) -> Result<()> {
        self.write(checkpoint, urls)
    }

    /// Read a repository list checkpoint.
    pub fn read_list(&self, checkpoint: Checkpoint) -> Result<Vec<String>> {
        self.read(checkpoint)
    }
}
