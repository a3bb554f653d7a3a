//! # CLI Command Implementations
//!
//! One module per subcommand of the `repo-harvest` command-line tool.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct with the command-specific options, derived using `clap`.
//! - An `execute` function that resolves the shared settings into a `Config`,
//!   builds a `Pipeline` and runs the matching stage(s).
//!
//! Stage commands print a short summary to stdout; progress and per-item
//! failures are reported through the log on stderr.

pub mod archive;
pub mod clone;
pub mod completions;
pub mod filter;
pub mod list;
pub mod run;

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
