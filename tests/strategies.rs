//! Cross-checks between the five strategies and the production index.

use exactline::index::{FreshnessPolicy, SearchIndex};
use exactline::strategy::{
    BinarySearch, HashSetLookup, LinearScan, MmapScan, SearchStrategy, StrategyKind,
};
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

fn corpus(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

fn grep_available() -> bool {
    Command::new("grep")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Strategies that run anywhere, plus external when grep exists
fn strategies() -> Vec<Box<dyn SearchStrategy>> {
    let mut kinds = vec![
        StrategyKind::Linear,
        StrategyKind::HashSet,
        StrategyKind::Mmap,
        StrategyKind::Binary,
    ];
    if grep_available() {
        kinds.push(StrategyKind::External);
    }
    kinds.into_iter().map(|k| k.build()).collect()
}

fn sorted_corpus() -> (NamedTempFile, Vec<String>) {
    let lines: Vec<String> = (1..=10).map(|i| format!("value-{:03}", i * 10)).collect();
    let file = corpus((lines.join("\n") + "\n").as_bytes());
    (file, lines)
}

#[test]
fn test_binary_search_scenario() {
    let (file, lines) = sorted_corpus();

    let hit = BinarySearch.search(file.path(), lines[6].as_bytes()).unwrap();
    assert!(hit.found);

    // Between line 3 ("value-030") and line 4 ("value-040")
    let miss = BinarySearch.search(file.path(), b"value-035").unwrap();
    assert!(!miss.found);
}

#[test]
fn test_all_strategies_agree_on_sorted_corpus() {
    let (file, lines) = sorted_corpus();
    let index = SearchIndex::open(file.path(), FreshnessPolicy::Cached).unwrap();

    let mut queries: Vec<String> = lines.clone();
    queries.extend(
        ["", "value-", "value-100 ", " value-010", "value-005", "value-999", "zzz"]
            .iter()
            .map(|s| s.to_string()),
    );

    for query in &queries {
        let expected = index.exists(query.as_bytes()).unwrap();
        for strategy in strategies() {
            let outcome = strategy.search(file.path(), query.as_bytes()).unwrap();
            assert_eq!(outcome.found, expected, "{} on {:?}", strategy.name(), query);
        }
    }
}

#[test]
fn test_line_ending_variants_agree() {
    // Sorted bytewise: "", "a b", "alpha", "beta", "gamma"
    let variants: [&[u8]; 3] = [
        b"\na b\nalpha\nbeta\ngamma\n",
        b"\r\na b\r\nalpha\r\nbeta\r\ngamma\r\n",
        b"\ra b\ralpha\rbeta\rgamma",
    ];
    let queries = ["", "a b", "alpha", "beta", "gamma", "alph", "gamma\r", "a"];

    for content in variants {
        let file = corpus(content);
        for query in queries {
            let baseline = LinearScan.contains(file.path(), query.as_bytes()).unwrap();
            for strategy in strategies() {
                let found = strategy.contains(file.path(), query.as_bytes()).unwrap();
                assert_eq!(
                    found,
                    baseline,
                    "{} on {:?} with {:?}",
                    strategy.name(),
                    query,
                    String::from_utf8_lossy(content)
                );
            }
        }
    }
}

#[test]
fn test_empty_corpus_never_matches() {
    let file = corpus(b"");
    for strategy in strategies() {
        for query in ["", "x"] {
            assert!(!strategy.contains(file.path(), query.as_bytes()).unwrap());
        }
    }
}

#[test]
fn test_unsorted_corpus_without_binary() {
    let file = corpus(b"pear\napple\nfig\n");
    let set_based = [
        Box::new(LinearScan) as Box<dyn SearchStrategy>,
        Box::new(HashSetLookup),
        Box::new(MmapScan),
    ];
    for strategy in &set_based {
        assert!(strategy.contains(file.path(), b"apple").unwrap());
        assert!(!strategy.contains(file.path(), b"grape").unwrap());
    }
}
