//! Build a set of every line, then probe it once

use super::{open_corpus, SearchStrategy};
use crate::error::StrategyResult;
use crate::utils::scan_lines;
use ahash::AHashSet;
use std::io::BufReader;
use std::path::Path;

/// O(n) build plus O(1) probe, rebuilt on every call
///
/// Measures what a per-query rebuild costs; the long-lived variant is
/// [`SearchIndex`](crate::index::SearchIndex) in cached mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashSetLookup;

impl SearchStrategy for HashSetLookup {
    fn name(&self) -> &'static str {
        "hash-set"
    }

    fn contains(&self, path: &Path, query: &[u8]) -> StrategyResult<bool> {
        let file = open_corpus(path)?;

        let mut set: AHashSet<Vec<u8>> = AHashSet::new();
        scan_lines(BufReader::new(file), |line| {
            if !set.contains(line) {
                set.insert(line.to_vec());
            }
            false
        })?;

        Ok(set.contains(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_probe_after_build() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\r\nb\r\n\r\n").unwrap();

        assert!(HashSetLookup.contains(file.path(), b"a").unwrap());
        assert!(HashSetLookup.contains(file.path(), b"").unwrap());
        assert!(!HashSetLookup.contains(file.path(), b"a\r").unwrap());
    }
}
