//! Splitting the organization's repository list by a name pattern.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The two halves of a partitioned repository list.
///
/// Both keep the relative order the URLs had in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub selected: Vec<String>,
    pub leftover: Vec<String>,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.selected.len() + self.leftover.len()
    }
}

/// Compile the partition pattern once.
///
/// An empty pattern is valid and matches every URL.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Route every URL into `selected` when `pattern` matches anywhere in it,
/// otherwise into `leftover`. No deduplication is performed.
pub fn partition<S: AsRef<str>>(urls: &[S], pattern: &Regex) -> Partition {
    let mut result = Partition::default();
    for url in urls {
        let url = url.as_ref();
        if pattern.is_match(url) {
            result.selected.push(url.to_string());
        } else {
            result.leftover.push(url.to_string());
        }
    }
    result
}
