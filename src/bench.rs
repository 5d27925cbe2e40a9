//! Strategy measurement harness behind `exactline bench`
//!
//! Every strategy answers the same queries against the same corpus; each
//! query is repeated `runs` times and the median is kept. The expected
//! outcome of each query comes from the linear baseline, so a strategy that
//! disagrees shows up as a mismatch rather than just a timing.

use crate::error::{StrategyError, StrategyResult};
use crate::strategy::{map_corpus, LinearScan, SearchStrategy, StrategyKind};
use crate::utils::lines;
use crate::utils::progress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bench options
#[derive(Debug, Clone)]
pub struct BenchOptions {
    pub strategies: Vec<StrategyKind>,
    /// Repetitions per query; the median is reported
    pub runs: usize,
    /// Run `binary` even when the corpus is not sorted
    pub force_binary: bool,
    pub show_progress: bool,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            strategies: StrategyKind::ALL.to_vec(),
            runs: 3,
            force_binary: false,
            show_progress: false,
        }
    }
}

/// One query's result for one strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTiming {
    pub query: String,
    pub expected: bool,
    pub found: Option<bool>,
    pub median_ms: Option<f64>,
    pub error: Option<String>,
}

/// Aggregate for one strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: StrategyKind,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mismatches: usize,
    pub errors: usize,
    /// Why the strategy was not run, if it was skipped
    pub skipped: Option<String>,
    pub queries: Vec<QueryTiming>,
}

/// Full bench result, serializable to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub corpus: PathBuf,
    pub corpus_lines: usize,
    pub sorted: bool,
    pub runs: usize,
    pub strategies: Vec<StrategyReport>,
}

impl BenchReport {
    pub fn report_for(&self, kind: StrategyKind) -> Option<&StrategyReport> {
        self.strategies.iter().find(|r| r.strategy == kind)
    }

    /// Whether any strategy disagreed with the baseline or failed
    pub fn has_failures(&self) -> bool {
        self.strategies
            .iter()
            .any(|r| r.mismatches > 0 || r.errors > 0)
    }
}

/// Shape of a corpus relevant to benchmarking
#[derive(Debug, Clone, Default)]
pub struct CorpusProfile {
    pub line_count: usize,
    pub sorted: bool,
    /// Lines at 0, 1/4, 1/2, 3/4 and the end of the file
    pub samples: Vec<String>,
}

/// Count lines, check sort order and pick sample lines
pub fn profile_corpus(path: &Path) -> StrategyResult<CorpusProfile> {
    let Some(mmap) = map_corpus(path)? else {
        return Ok(CorpusProfile {
            sorted: true,
            ..CorpusProfile::default()
        });
    };

    let mut line_count: usize = 0;
    let mut sorted = true;
    let mut prev: Option<&[u8]> = None;
    for line in lines(&mmap) {
        if let Some(p) = prev
            && p > line
        {
            sorted = false;
        }
        prev = Some(line);
        line_count += 1;
    }

    let mut wanted = vec![
        0,
        line_count / 4,
        line_count / 2,
        3 * line_count / 4,
        line_count.saturating_sub(1),
    ];
    wanted.dedup();
    let samples = lines(&mmap)
        .enumerate()
        .filter(|(i, _)| wanted.contains(i))
        .map(|(_, line)| String::from_utf8_lossy(line).into_owned())
        .collect();

    Ok(CorpusProfile {
        line_count,
        sorted,
        samples,
    })
}

/// Sample lines plus `absent` queries that cannot occur in the corpus
pub fn default_queries(profile: &CorpusProfile, absent: usize) -> Vec<String> {
    let mut queries = profile.samples.clone();
    queries.extend((0..absent).map(|i| format!("NONEXISTENT_{:04}", i)));
    queries
}

/// Run every selected strategy over `queries`
pub fn run(path: &Path, queries: &[String], options: &BenchOptions) -> StrategyResult<BenchReport> {
    if !path.is_file() {
        return Err(StrategyError::NotFound(path.to_path_buf()));
    }

    let profile = profile_corpus(path)?;
    let runs = options.runs.max(1);

    let expected = queries
        .iter()
        .map(|q| LinearScan.contains(path, q.as_bytes()))
        .collect::<StrategyResult<Vec<bool>>>()?;

    let bar = progress::query_bar(
        (options.strategies.len() * queries.len()) as u64,
        options.show_progress,
    );

    let mut reports = Vec::with_capacity(options.strategies.len());
    for &kind in &options.strategies {
        bar.set_message(kind.name());

        if kind.requires_sorted() && !profile.sorted && !options.force_binary {
            bar.inc(queries.len() as u64);
            reports.push(skipped(kind, "corpus is not sorted"));
            continue;
        }

        let strategy = kind.build();
        let timings = queries
            .iter()
            .zip(&expected)
            .map(|(query, &expected)| {
                let timing = time_query(strategy.as_ref(), path, query, expected, runs);
                bar.inc(1);
                timing
            })
            .collect();

        reports.push(summarize(kind, timings));
    }
    bar.finish_and_clear();

    Ok(BenchReport {
        corpus: path.to_path_buf(),
        corpus_lines: profile.line_count,
        sorted: profile.sorted,
        runs,
        strategies: reports,
    })
}

fn time_query(
    strategy: &dyn SearchStrategy,
    path: &Path,
    query: &str,
    expected: bool,
    runs: usize,
) -> QueryTiming {
    let mut elapsed = Vec::with_capacity(runs);
    let mut found = None;

    for _ in 0..runs {
        match strategy.search(path, query.as_bytes()) {
            Ok(outcome) => {
                elapsed.push(outcome.elapsed);
                found = Some(outcome.found);
            }
            Err(e) => {
                tracing::warn!(strategy = strategy.name(), %query, error = %e, "strategy failed");
                return QueryTiming {
                    query: query.to_string(),
                    expected,
                    found: None,
                    median_ms: None,
                    error: Some(e.to_string()),
                };
            }
        }
    }

    QueryTiming {
        query: query.to_string(),
        expected,
        found,
        median_ms: median(&mut elapsed).map(as_ms),
        error: None,
    }
}

fn summarize(kind: StrategyKind, queries: Vec<QueryTiming>) -> StrategyReport {
    let times: Vec<f64> = queries.iter().filter_map(|q| q.median_ms).collect();
    let (avg_ms, min_ms, max_ms) = if times.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = times.iter().sum();
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (sum / times.len() as f64, min, max)
    };

    StrategyReport {
        strategy: kind,
        avg_ms,
        min_ms,
        max_ms,
        mismatches: queries
            .iter()
            .filter(|q| q.found.is_some_and(|f| f != q.expected))
            .count(),
        errors: queries.iter().filter(|q| q.error.is_some()).count(),
        skipped: None,
        queries,
    }
}

fn skipped(kind: StrategyKind, reason: &str) -> StrategyReport {
    StrategyReport {
        strategy: kind,
        avg_ms: 0.0,
        min_ms: 0.0,
        max_ms: 0.0,
        mismatches: 0,
        errors: 0,
        skipped: Some(reason.to_string()),
        queries: Vec::new(),
    }
}

fn median(values: &mut [Duration]) -> Option<Duration> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    Some(values[values.len() / 2])
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
