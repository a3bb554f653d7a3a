//! # Repository Cloning Seam
//!
//! The clone stage talks to version control only through the
//! [`GitOperations`] trait. In the application `DefaultGitOperations` wraps the
//! system `git` command; in tests a mock records the calls and simulates
//! failures without touching the network.
//!
//! This module also owns the mapping from a repository URL to the name of its
//! local directory, which the clone and archive stages both rely on.

use std::path::Path;

use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Clones `url` into `target_dir`.
    ///
    /// Implementations must not remove or overwrite an existing `target_dir`.
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, target_dir)
    }
}

/// Local directory name for a repository URL: the text after the last `/`.
///
/// Trailing slashes are ignored. Returns `None` when no usable name remains
/// (an empty segment, `.` or `..`).
pub fn directory_name(url: &str) -> Option<&str> {
    let trimmed = url.trim_end_matches('/');
    let name = match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };

    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}
