use std::fs;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::Error;

/// Clone a repository into `target_dir` with the system git command
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
///
/// An existing `target_dir` is left untouched: git refuses to clone into a
/// non-empty directory and the refusal is returned as [`Error::GitClone`].
pub fn clone(url: &str, target_dir: &Path) -> Result<(), Error> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!("git clone {} {}", url, target_dir.display());
    let output = Command::new("git")
        // `--` keeps a URL starting with `-` from being read as an option
        .args(["clone", "--quiet", "--", url])
        .arg(target_dir)
        // Never block on an interactive credential prompt
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| Error::GitCommand {
            command: "clone".to_string(),
            url: url.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::GitClone {
            url: url.to_string(),
            hint: clone_hint(&stderr),
            message: stderr,
        });
    }

    Ok(())
}

/// Suggest a fix for the clone failures operators hit most often.
fn clone_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
        || stderr.contains("could not read Username")
    {
        Some(
            "Make sure you have access to the repository. For private repos, ensure \
             you have an SSH key in ssh-agent, git credentials configured, or a \
             personal access token set up"
                .to_string(),
        )
    } else if stderr.contains("already exists and is not an empty directory") {
        Some("Remove or move the existing directory to clone it again".to_string())
    } else {
        None
    }
}
