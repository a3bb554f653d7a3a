//! # Error Handling
//!
//! This module defines the centralized error type for `repo-harvest`. It uses
//! the `thiserror` library to build a single `Error` enum covering every
//! failure the pipeline can report, with enough context (URL, checkpoint key,
//! path) for an operator to act on the message.
//!
//! ## Failure Classes
//!
//! The variants fall into the classes the pipeline treats differently:
//!
//! - **Stage-level**: `Network`, `Api`, `Config`, `Regex`, `CheckpointMissing`,
//!   `CheckpointCorrupt`. These propagate and halt the run.
//! - **Item-level**: `GitClone`, `NameCollision`, `Archive`. The clone and
//!   archive phases catch these per repository, log them and continue.
//!
//! Checkpoint reads never collapse into an empty list: a file that does not
//! exist is `CheckpointMissing`, a file that exists but cannot be parsed is
//! `CheckpointCorrupt`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for repo-harvest operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration is incomplete or inconsistent.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A request to the hosting provider could not be completed.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The hosting provider answered with a non-success status.
    #[error("API request failed for {url}: HTTP {status} - {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// An error occurred while cloning a Git repository.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// The `git` executable could not be started.
    #[error("Git command failed for {url}: {command} - {stderr}")]
    GitCommand {
        command: String,
        url: String,
        stderr: String,
    },

    /// Two URLs in one batch map to the same local directory name.
    #[error("Repository name collision: '{name}' is used by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// A checkpoint was requested that has never been written.
    #[error("Checkpoint '{key}' not found at {}", path.display())]
    CheckpointMissing { key: String, path: PathBuf },

    /// A checkpoint exists but does not hold a list of strings.
    #[error("Checkpoint '{key}' at {} is unreadable: {message}", path.display())]
    CheckpointCorrupt {
        key: String,
        path: PathBuf,
        message: String,
    },

    /// Building a single archive failed.
    #[error("Archive error for {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
