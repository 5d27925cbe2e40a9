//! Exact-line membership index over a corpus file

use super::types::FreshnessPolicy;
use crate::error::{IndexError, IndexResult};
use crate::utils::{lines, scan_lines};
use ahash::AHashSet;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Read buffer for reread scans
const REREAD_BUFFER_SIZE: usize = 64 * 1024;

/// Answers "is this exact line in the corpus?"
///
/// In [`FreshnessPolicy::Cached`] mode the distinct lines are loaded once and
/// the set is never written again, so it can be shared across threads behind
/// an `Arc` without locking. In [`FreshnessPolicy::Reread`] mode every query
/// streams the file from disk; concurrent writers may produce torn reads.
pub struct SearchIndex {
    path: PathBuf,
    policy: FreshnessPolicy,
    lines: Option<AHashSet<Box<[u8]>>>,
}

impl SearchIndex {
    /// Open the corpus at `path`
    ///
    /// Fails with [`IndexError::NotFound`] unless `path` is a regular file.
    pub fn open(path: &Path, policy: FreshnessPolicy) -> IndexResult<Self> {
        let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return Err(IndexError::NotFound(path.to_path_buf()));
        }

        let lines = match policy {
            FreshnessPolicy::Cached => Some(load_line_set(path)?),
            FreshnessPolicy::Reread => None,
        };

        Ok(Self {
            path: path.to_path_buf(),
            policy,
            lines,
        })
    }

    /// Whether `query` equals some corpus line
    ///
    /// Never fails in cached mode.
    pub fn exists(&self, query: &[u8]) -> IndexResult<bool> {
        match &self.lines {
            Some(set) => Ok(set.contains(query)),
            None => self.scan_file(query),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// Number of distinct lines held in memory (`None` in reread mode)
    pub fn cached_len(&self) -> Option<usize> {
        self.lines.as_ref().map(|set| set.len())
    }

    fn scan_file(&self, query: &[u8]) -> IndexResult<bool> {
        let io_err = |source| IndexError::Io {
            path: self.path.clone(),
            source,
        };

        let file = File::open(&self.path).map_err(io_err)?;
        let reader = BufReader::with_capacity(REREAD_BUFFER_SIZE, file);
        scan_lines(reader, |line| line == query).map_err(io_err)
    }
}

/// Build the distinct-line set from a read-only mapping of the file
fn load_line_set(path: &Path) -> IndexResult<AHashSet<Box<[u8]>>> {
    let io_err = |source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();

    let mut set = AHashSet::new();
    // Zero-length files cannot be mapped on every platform
    if len == 0 {
        return Ok(set);
    }

    let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };
    for line in lines(&mmap) {
        if !set.contains(line) {
            set.insert(Box::from(line));
        }
    }

    Ok(set)
}
