//! Streaming line-by-line scan; the correctness baseline

use super::{open_corpus, SearchStrategy};
use crate::error::StrategyResult;
use crate::utils::{is_matchable, scan_lines};
use std::io::BufReader;
use std::path::Path;

/// Reads the corpus through a buffered reader and stops at the first equal line
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl SearchStrategy for LinearScan {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn contains(&self, path: &Path, query: &[u8]) -> StrategyResult<bool> {
        let file = open_corpus(path)?;
        if !is_matchable(query) {
            return Ok(false);
        }
        Ok(scan_lines(BufReader::new(file), |line| line == query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_stops_at_match() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"apple\nbanana\ncherry\n").unwrap();

        assert!(LinearScan.contains(file.path(), b"banana").unwrap());
        assert!(!LinearScan.contains(file.path(), b"ban").unwrap());
        assert!(!LinearScan.contains(file.path(), b"apple\nbanana").unwrap());
    }
}
