//! # Terminal Output
//!
//! Helpers for the human-readable summaries printed at the end of each
//! command. Emoji markers are used only when the terminal supports color;
//! otherwise a bracketed plain-text marker is printed instead.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use repo_harvest::output::{emoji, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Cloned 3 repositories", emoji(&config, "✅", "[OK]"));
//! ```

use std::env;

use crate::phases::archive::{ArchiveReport, ArchiveStatus};
use crate::phases::clone::{CloneReport, CloneStatus};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` and `never` force the choice; anything else detects support
    /// from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Marker for a line reporting success or failure.
pub fn status_marker(config: &OutputConfig, ok: bool) -> &'static str {
    if ok {
        emoji(config, "✅", "[OK]")
    } else {
        emoji(config, "❌", "[FAILED]")
    }
}

/// Summary lines for a clone stage: one headline plus one line per failure.
pub fn clone_summary(config: &OutputConfig, report: &CloneReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} Cloned {} of {} repositories",
        status_marker(config, report.failed() == 0),
        report.cloned(),
        report.attempted()
    )];
    for outcome in report.failures() {
        let reason = match &outcome.status {
            CloneStatus::Failed { message } => first_line(message).to_string(),
            CloneStatus::Collision { existing_url } => {
                format!("directory name already used by {}", existing_url)
            }
            CloneStatus::Cloned => continue,
        };
        lines.push(format!("   {}: {}", outcome.url, reason));
    }
    lines
}

/// Summary lines for an archive stage: one headline plus one line per failure.
pub fn archive_summary(config: &OutputConfig, report: &ArchiveReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} Archived {} of {} repositories",
        status_marker(config, report.failed() == 0),
        report.archived(),
        report.attempted()
    )];
    for outcome in report.failures() {
        if let ArchiveStatus::Failed { message } = &outcome.status {
            lines.push(format!("   {}: {}", outcome.name, first_line(message)));
        }
    }
    lines
}

/// Git errors span several lines; summaries keep only the first.
fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
