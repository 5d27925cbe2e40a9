//! Bisection over byte offsets of a sorted, memory-mapped corpus

use super::{map_corpus, SearchStrategy};
use crate::error::StrategyResult;
use crate::utils::{is_matchable, line_at, line_start_at_or_after};
use std::cmp::Ordering;
use std::path::Path;

/// O(log n) comparisons on a corpus sorted ascending by bytes
///
/// Sortedness is a precondition that is not verified; on unsorted input the
/// answer is unspecified (but the search still terminates).
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearch;

impl SearchStrategy for BinarySearch {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn contains(&self, path: &Path, query: &[u8]) -> StrategyResult<bool> {
        let Some(mmap) = map_corpus(path)? else {
            return Ok(false);
        };
        if !is_matchable(query) {
            return Ok(false);
        }
        Ok(bisect(&mmap, query))
    }
}

/// Binary search for `query` among the normalized lines of `data`
///
/// `lo` always sits on a line start and `hi` is a line start or the end of
/// the buffer; every line before `lo` is less than the query and every line
/// from `hi` on is greater.
pub fn bisect(data: &[u8], query: &[u8]) -> bool {
    let mut lo = 0;
    let mut hi = data.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let mut start = line_start_at_or_after(data, mid);
        if start >= hi {
            // No line begins in [mid, hi): probe the first line of the window
            start = lo;
        }

        let (line, next) = line_at(data, start);
        match line.cmp(query) {
            Ordering::Equal => return true,
            Ordering::Less => lo = next,
            Ordering::Greater => hi = start,
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_corpus(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line{:03}", i * 10)).collect()
    }

    #[test]
    fn test_every_line_is_found() {
        for n in 0..40 {
            let lines = sorted_corpus(n);
            let data = lines.join("\n") + "\n";
            for line in &lines {
                assert!(bisect(data.as_bytes(), line.as_bytes()), "n={n} {line}");
            }
        }
    }

    #[test]
    fn test_absent_values_between_lines() {
        let lines = sorted_corpus(10);
        let data = lines.join("\n");
        assert!(bisect(data.as_bytes(), lines[6].as_bytes()));
        // "line025" falls strictly between lines 3 and 4 (1-based)
        assert!(!bisect(data.as_bytes(), b"line025"));
        assert!(!bisect(data.as_bytes(), b"a"));
        assert!(!bisect(data.as_bytes(), b"z"));
        assert!(!bisect(data.as_bytes(), b"line"));
    }

    #[test]
    fn test_mixed_terminators_and_blank_line() {
        let data = b"\r\nalpha\r\nbeta\rdelta\ngamma";
        for q in ["", "alpha", "beta", "delta", "gamma"] {
            assert!(bisect(data, q.as_bytes()), "missed {q:?}");
        }
        assert!(!bisect(data, b"alpha\r"));
        assert!(!bisect(data, b"\r\nalpha"));
        assert!(!bisect(data, b"epsilon"));
    }

    #[test]
    fn test_empty_input() {
        assert!(!bisect(b"", b""));
        assert!(!bisect(b"", b"x"));
    }

    #[test]
    fn test_unsorted_input_terminates() {
        let data = b"zeta\nalpha\nmu\nbeta\n";
        // Result is unspecified, only termination matters
        let _ = bisect(data, b"beta");
        let _ = bisect(data, b"omega");
    }
}
