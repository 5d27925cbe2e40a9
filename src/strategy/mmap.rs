//! Scan a read-only memory mapping without copying lines out

use super::{map_corpus, SearchStrategy};
use crate::error::StrategyResult;
use crate::utils::{is_matchable, lines};
use memchr::memmem;
use std::path::Path;

/// Same O(n) worst case as [`LinearScan`](super::LinearScan), but works on
/// the mapped pages directly
///
/// Candidate positions come from a SIMD substring search; only hits that sit
/// exactly on line boundaries count. The empty query has no substring to
/// search for, so it falls back to walking lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct MmapScan;

impl SearchStrategy for MmapScan {
    fn name(&self) -> &'static str {
        "mmap"
    }

    fn contains(&self, path: &Path, query: &[u8]) -> StrategyResult<bool> {
        let Some(mmap) = map_corpus(path)? else {
            return Ok(false);
        };
        if !is_matchable(query) {
            return Ok(false);
        }
        if query.is_empty() {
            return Ok(lines(&mmap).any(|line| line.is_empty()));
        }
        Ok(contains_line(&mmap, query))
    }
}

/// Whether some occurrence of `query` in `data` spans exactly one whole line
fn contains_line(data: &[u8], query: &[u8]) -> bool {
    memmem::find_iter(data, query).any(|start| {
        let end = start + query.len();
        let at_line_start = start == 0 || matches!(data[start - 1], b'\n' | b'\r');
        let at_line_end = end == data.len() || matches!(data[end], b'\n' | b'\r');
        at_line_start && at_line_end
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_boundaries() {
        let data = b"pineapple\napple pie\napple\r\n";
        assert!(contains_line(data, b"apple"));
        assert!(contains_line(data, b"apple pie"));
        assert!(!contains_line(data, b"pie"));
        assert!(!contains_line(data, b"pine"));
        assert!(contains_line(b"x\rapple", b"apple"));
    }

    #[test]
    fn test_empty_file_and_empty_query() {
        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(!MmapScan.contains(empty.path(), b"").unwrap());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\n\nb\n").unwrap();
        assert!(MmapScan.contains(file.path(), b"").unwrap());
        assert!(MmapScan.contains(file.path(), b"b").unwrap());
    }
}
