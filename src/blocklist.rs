//! Suffix blocklist for filtered names.
//!
//! Queries whose name equals, or is a subdomain of, a listed name are
//! refused at the HTTP layer before any resolution happens.

use std::collections::HashSet;
use std::fs;

use log::info;

use crate::errors::DnsError;

/// A set of blocked name suffixes.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    entries: HashSet<String>,
}

impl BlockList {
    /// An empty blocklist that blocks nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a blocklist from a newline-separated file.
    ///
    /// Lines are trimmed and lowercased; blank lines and `#` comments
    /// are skipped. Trailing dots are normalized away.
    pub fn from_file(path: &str) -> Result<Self, DnsError> {
        let content = fs::read_to_string(path)?;
        let entries: HashSet<String> = content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.trim_end_matches('.').to_ascii_lowercase())
            .collect();
        info!("Loaded {} blocklist entries from {}", entries.len(), path);
        Ok(Self { entries })
    }

    /// Check whether a queried name is blocked.
    ///
    /// # Arguments
    /// * `name` - Dot-terminated query name, e.g. `"ads.example.com."`.
    pub fn is_blocked(&self, name: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let name = name.trim_end_matches('.').to_ascii_lowercase();
        // Walk parent domains: ads.example.com, example.com, com.
        let mut suffix = name.as_str();
        loop {
            if self.entries.contains(suffix) {
                return true;
            }
            match suffix.split_once('.') {
                Some((_, rest)) => suffix = rest,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> BlockList {
        BlockList {
            entries: entries.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn blocks_exact_names_and_subdomains() {
        let blocklist = list(&["tracker.example"]);
        assert!(blocklist.is_blocked("tracker.example."));
        assert!(blocklist.is_blocked("cdn.tracker.example."));
        assert!(!blocklist.is_blocked("example."));
        assert!(!blocklist.is_blocked("nottracker.example."));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let blocklist = list(&["ads.test"]);
        assert!(blocklist.is_blocked("ADS.Test."));
    }

    #[test]
    fn empty_list_blocks_nothing() {
        assert!(!BlockList::empty().is_blocked("anything.at.all."));
    }
}
