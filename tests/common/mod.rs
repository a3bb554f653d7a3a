//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::MINIMAL);
//!     fixture.command().arg("filter").assert().success();
//! }
//! ```

use assert_cmd::Command;
use assert_fs::prelude::*;
use std::path::Path;
use std::process;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::configs;
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Environment variables the binary reads settings from.
const SETTINGS_ENV: &[&str] = &[
    "GIT_ORG",
    "GIT_AUTH_TOKEN",
    "REPO_FILTER_REGEX",
    "REPO_HARVEST_CONFIG",
    "GITHUB_API_URL",
    "RUST_LOG",
];

/// Common configuration YAML snippets for testing.
pub mod configs {
    /// Selects repositories whose URL ends in `-service`.
    pub const MINIMAL: &str = r#"
organization: acme
pattern: "-service$"
"#;

    /// Misspelled key, rejected by the parser.
    pub const UNKNOWN_KEY: &str = "organisation: acme\n";
}

/// Whether a usable `git` executable is on the PATH.
pub fn git_available() -> bool {
    process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// A temporary working directory for one invocation of the binary.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `repo-harvest.yaml` in the working directory.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("repo-harvest.yaml", content)
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Write a checkpoint list under `lists/`.
    pub fn with_list(self, file_name: &str, urls: &[&str]) -> Self {
        let json = serde_json::to_string(urls).expect("Failed to serialize list");
        self.with_file(&format!("lists/{}", file_name), &json)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a checkpoint list back from `lists/`.
    pub fn read_list(&self, file_name: &str) -> Vec<String> {
        let raw = std::fs::read_to_string(self.path().join("lists").join(file_name))
            .expect("Failed to read checkpoint");
        serde_json::from_str(&raw).expect("Checkpoint is not a list of strings")
    }

    /// The binary, run inside the fixture and isolated from any settings in
    /// the caller's environment.
    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repo-harvest");
        cmd.current_dir(self.path()).env("NO_COLOR", "1");
        for var in SETTINGS_ENV {
            cmd.env_remove(var);
        }
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
