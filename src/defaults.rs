//! Default values for repo-harvest configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Base URL of the GitHub REST API.
pub const API_URL: &str = "https://api.github.com";

/// Page size requested from the organization listing endpoint.
///
/// 100 is the largest page GitHub serves.
pub const PER_PAGE: u32 = 100;

/// Deflate level used when no level is configured (maximum compression).
pub const COMPRESSION_LEVEL: u8 = 9;

/// Config file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "repo-harvest.yaml";

/// Placeholder that keeps an otherwise empty directory under version control.
/// Never treated as a cloned repository.
pub const PLACEHOLDER: &str = ".gitkeep";

/// `User-Agent` sent with every API request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("repo-harvest/", env!("CARGO_PKG_VERSION"));

/// Directory holding the checkpoint lists.
pub fn lists_dir() -> PathBuf {
    PathBuf::from("lists")
}

/// Directory receiving one clone per selected repository.
pub fn repos_dir() -> PathBuf {
    PathBuf::from("repos")
}

/// Directory receiving one `.zip` per cloned repository.
pub fn archives_dir() -> PathBuf {
    PathBuf::from("archives")
}
