#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any client frame must normalize without panicking
    let query = exactline::server::protocol::normalize_query(data);
    assert_eq!(query.trim(), query);
    let _ = exactline::server::protocol::truncate_for_log(&query);
});
