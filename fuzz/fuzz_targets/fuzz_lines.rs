#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    corpus: &'a [u8],
    query: &'a [u8],
}

fuzz_target!(|input: Input| {
    // Streaming and in-memory splitting must agree
    let in_memory: Vec<Vec<u8>> = exactline::utils::lines(input.corpus)
        .map(|line| line.to_vec())
        .collect();
    let mut streamed = Vec::new();
    let _ = exactline::utils::scan_lines(input.corpus, |line| {
        streamed.push(line.to_vec());
        false
    });
    assert_eq!(in_memory, streamed);

    // Bisection may answer wrongly on unsorted input but must terminate
    let _ = exactline::strategy::binary::bisect(input.corpus, input.query);
});
