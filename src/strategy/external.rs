//! Delegate the membership check to an external whole-line matcher
//!
//! The capability is injected through [`LineFilter`], so a platform without
//! `grep` can plug in an equivalent or surface
//! [`StrategyError::Unsupported`] instead of a silent "not found".

use super::{open_corpus, SearchStrategy};
use crate::error::{StrategyError, StrategyResult};
use crate::utils::{is_matchable, scan_lines};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// "Does this exact line exist in this corpus?" answered by someone else
pub trait LineFilter: Send + Sync {
    /// `corpus` is already open; `query` never contains LF or CR
    fn line_exists(&self, corpus: File, query: &[u8]) -> StrategyResult<bool>;
}

impl<F> LineFilter for F
where
    F: Fn(File, &[u8]) -> StrategyResult<bool> + Send + Sync,
{
    fn line_exists(&self, corpus: File, query: &[u8]) -> StrategyResult<bool> {
        self(corpus, query)
    }
}

/// Strategy wrapper around any [`LineFilter`]; spawn and I/O time count
/// toward the measured cost
pub struct ExternalFilter<F> {
    filter: F,
}

impl<F: LineFilter> ExternalFilter<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }
}

impl<F: LineFilter> SearchStrategy for ExternalFilter<F> {
    fn name(&self) -> &'static str {
        "external"
    }

    fn contains(&self, path: &Path, query: &[u8]) -> StrategyResult<bool> {
        let corpus = open_corpus(path)?;
        if !is_matchable(query) {
            return Ok(false);
        }
        self.filter.line_exists(corpus, query)
    }
}

/// `grep -F -x -q` fed with the normalized corpus on stdin
///
/// Lines are re-terminated with LF before they reach grep, so CR and CRLF
/// corpora compare exactly like they do everywhere else. `LC_ALL=C` keeps
/// the comparison bytewise.
#[derive(Debug, Clone)]
pub struct GrepFilter {
    program: PathBuf,
}

impl Default for GrepFilter {
    fn default() -> Self {
        Self::with_program("grep")
    }
}

impl GrepFilter {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl LineFilter for GrepFilter {
    fn line_exists(&self, corpus: File, query: &[u8]) -> StrategyResult<bool> {
        let pattern = query_arg(query)?;

        let mut child = Command::new(&self.program)
            .args(["-a", "-F", "-x", "-q", "-e"])
            .arg(pattern)
            .env("LC_ALL", "C")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    StrategyError::Unsupported(format!("{} not found", self.program.display()))
                } else {
                    StrategyError::External(format!("failed to spawn {}: {}", self.program.display(), e))
                }
            })?;

        feed_or_reap(&mut child, corpus)?;

        let output = child.wait_with_output()?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            Some(code) => Err(StrategyError::External(format!(
                "{} exited with status {}: {}",
                self.program.display(),
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            None => Err(StrategyError::External(format!(
                "{} terminated by signal",
                self.program.display()
            ))),
        }
    }
}

/// Feed the corpus to the child; on failure the child is killed and reaped
fn feed_or_reap<R: Read>(child: &mut Child, corpus: R) -> io::Result<()> {
    let Some(stdin) = child.stdin.take() else {
        return Ok(());
    };

    if let Err(e) = feed_lines(corpus, stdin) {
        let _ = child.kill();
        let _ = child.wait();
        return Err(e);
    }
    Ok(())
}

/// Copy normalized lines into the child's stdin
///
/// grep exits as soon as it sees a match, so a broken pipe just means the
/// answer is already known.
fn feed_lines<R: Read>(corpus: R, stdin: impl Write) -> io::Result<()> {
    let mut writer = BufWriter::new(stdin);
    let mut write_err = None;

    scan_lines(BufReader::new(corpus), |line| {
        let result = writer.write_all(line).and_then(|_| writer.write_all(b"\n"));
        match result {
            Ok(()) => false,
            Err(e) => {
                write_err = Some(e);
                true
            }
        }
    })?;

    let result = match write_err {
        Some(e) => Err(e),
        None => writer.flush(),
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(unix)]
fn query_arg(query: &[u8]) -> StrategyResult<OsString> {
    use std::os::unix::ffi::OsStrExt;

    if query.contains(&0) {
        return Err(StrategyError::Unsupported(
            "query contains a NUL byte, which cannot be passed as an argument".to_string(),
        ));
    }
    Ok(std::ffi::OsStr::from_bytes(query).to_os_string())
}

#[cfg(not(unix))]
fn query_arg(query: &[u8]) -> StrategyResult<OsString> {
    match std::str::from_utf8(query) {
        Ok(s) if !s.contains('\0') => Ok(OsString::from(s)),
        _ => Err(StrategyError::Unsupported(
            "query is not representable as a process argument".to_string(),
        )),
    }
}
