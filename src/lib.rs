//! # Repo Harvest Library
//!
//! This library enumerates every repository of a GitHub organization, splits
//! the list with a regular expression, clones the selected repositories and
//! packs each clone into a zip archive. It is designed to be used by the
//! `repo-harvest` command-line tool but the stages can be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use repo_harvest::checkpoint::{Checkpoint, CheckpointStore};
//! use repo_harvest::partition::{compile_pattern, partition};
//!
//! let full = vec![
//!     "https://github.com/acme/billing-service".to_string(),
//!     "https://github.com/acme/website".to_string(),
//! ];
//! let pattern = compile_pattern("-service$").unwrap();
//! let result = partition(&full, &pattern);
//! assert_eq!(result.selected, vec!["https://github.com/acme/billing-service"]);
//! assert_eq!(result.leftover, vec!["https://github.com/acme/website"]);
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = CheckpointStore::new(dir.path());
//! store.write_list(Checkpoint::Selected, &result.selected).unwrap();
//! assert_eq!(store.read_list(Checkpoint::Selected).unwrap(), result.selected);
//! ```
//!
//! ## Core Concepts
//!
//! - **Checkpoints (`checkpoint`)**: JSON lists persisted between stages. Each
//!   stage reads its input from disk, so any stage can be re-run on its own.
//! - **Listing (`github`)**: Paginated `GET /orgs/{org}/repos` behind the
//!   `RepositoryLister` trait.
//! - **Partitioning (`partition`)**: Order-preserving split by one regex.
//! - **Cloning (`repository`, `git`)**: The `GitOperations` trait and its
//!   system-`git` implementation.
//! - **Archiving (`archive`)**: The `ArchiveWriter` trait and its zip
//!   implementation.
//! - **Stages (`phases`)**: The four stages and the `Pipeline` orchestrator.
//!
//! ## Execution Flow
//!
//! 1.  **Enumerate**: list the organization into `fullList.json`.
//! 2.  **Filter**: split it into `filteredList.json` and `leftoverList.json`.
//! 3.  **Clone**: clone each selected repository into the repos directory,
//!     recording every outcome in `cloneReport.json`.
//! 4.  **Archive** (optional): zip each cloned directory into the archives
//!     directory.
//!
//! Failures of a single clone or archive are logged and recorded without
//! stopping the batch; failures of the listing or of checkpoint I/O stop the
//! run.

pub mod archive;
pub mod checkpoint;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod github;
pub mod output;
pub mod partition;
pub mod phases;
pub mod repository;
