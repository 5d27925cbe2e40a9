//! Interchangeable exact-line membership algorithms
//!
//! Production traffic goes through [`SearchIndex`](crate::index::SearchIndex);
//! these strategies exist for correctness cross-checks and measurement
//! (`exactline check`, `exactline bench`). All five share one contract:
//! a query matches iff it equals, byte for byte, a line of the corpus after
//! LF / CRLF / CR stripping.
//!
//! | Strategy   | Time            | Extra space |
//! |------------|-----------------|-------------|
//! | `linear`   | O(n)            | O(1)        |
//! | `hash-set` | O(n) + O(1)     | O(n)        |
//! | `external` | O(n) + spawn    | O(1)        |
//! | `mmap`     | O(n)            | O(1)        |
//! | `binary`   | O(log n)        | O(1)        |
//!
//! `binary` requires the corpus to be sorted ascending (bytewise) and does
//! not check it.

pub mod binary;
pub mod external;
pub mod hash_set;
pub mod linear;
pub mod mmap;

pub use binary::BinarySearch;
pub use external::{ExternalFilter, GrepFilter, LineFilter};
pub use hash_set::HashSetLookup;
pub use linear::LinearScan;
pub use mmap::MmapScan;

use crate::error::{StrategyError, StrategyResult};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of one timed strategy run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub found: bool,
    pub elapsed: Duration,
}

/// One exact-line membership algorithm
pub trait SearchStrategy: Send + Sync {
    /// Stable identifier used in reports
    fn name(&self) -> &'static str;

    /// Untimed membership check
    fn contains(&self, path: &Path, query: &[u8]) -> StrategyResult<bool>;

    /// Membership check with wall-clock cost, including any setup the
    /// strategy does per call (opening, mapping, building, spawning)
    fn search(&self, path: &Path, query: &[u8]) -> StrategyResult<SearchOutcome> {
        let start = Instant::now();
        let found = self.contains(path, query)?;
        Ok(SearchOutcome {
            found,
            elapsed: start.elapsed(),
        })
    }
}

/// Selectable strategy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Linear,
    HashSet,
    External,
    Mmap,
    Binary,
}

impl StrategyKind {
    /// All strategies in canonical report order
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Linear,
        StrategyKind::HashSet,
        StrategyKind::External,
        StrategyKind::Mmap,
        StrategyKind::Binary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Linear => LinearScan.name(),
            StrategyKind::HashSet => HashSetLookup.name(),
            StrategyKind::External => "external",
            StrategyKind::Mmap => MmapScan.name(),
            StrategyKind::Binary => BinarySearch.name(),
        }
    }

    /// Whether correctness depends on the corpus being sorted
    pub fn requires_sorted(self) -> bool {
        matches!(self, StrategyKind::Binary)
    }

    /// Instantiate the strategy; `external` uses the system `grep`
    pub fn build(self) -> Box<dyn SearchStrategy> {
        match self {
            StrategyKind::Linear => Box::new(LinearScan),
            StrategyKind::HashSet => Box::new(HashSetLookup),
            StrategyKind::External => Box::new(ExternalFilter::new(GrepFilter::default())),
            StrategyKind::Mmap => Box::new(MmapScan),
            StrategyKind::Binary => Box::new(BinarySearch),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every strategy, in canonical order
pub fn all_strategies() -> Vec<Box<dyn SearchStrategy>> {
    StrategyKind::ALL.iter().map(|k| k.build()).collect()
}

/// Open the corpus, mapping a missing file to [`StrategyError::NotFound`]
pub(crate) fn open_corpus(path: &Path) -> StrategyResult<File> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StrategyError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Read-only mapping of the corpus; `None` for an empty file
pub(crate) fn map_corpus(path: &Path) -> StrategyResult<Option<Mmap>> {
    let file = open_corpus(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(Some(mmap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_strategies() {
        let built = all_strategies();
        assert_eq!(built.len(), StrategyKind::ALL.len());
        for (kind, strategy) in StrategyKind::ALL.iter().zip(&built) {
            assert_eq!(kind.name(), strategy.name());
        }
    }

    #[test]
    fn test_only_binary_requires_sorted() {
        let sorted: Vec<_> = StrategyKind::ALL
            .iter()
            .filter(|k| k.requires_sorted())
            .collect();
        assert_eq!(sorted, vec![&StrategyKind::Binary]);
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&StrategyKind::HashSet).unwrap();
        assert_eq!(json, "\"hash-set\"");
        let parsed: StrategyKind = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(parsed, StrategyKind::Binary);
    }

    #[test]
    fn test_missing_corpus_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");
        for strategy in all_strategies() {
            let err = strategy.search(&missing, b"x").unwrap_err();
            assert!(
                matches!(err, StrategyError::NotFound(_)),
                "{} returned {err}",
                strategy.name()
            );
        }
    }
}
