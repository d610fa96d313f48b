//! Fuzz pagination parameter parsing.
//!
//! Whatever the client sends as `page` or `limit`, the parsed value is at
//! least 1 and parsing never panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use product_api::query::{DEFAULT_LIMIT, DEFAULT_PAGE, parse_positive};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    assert!(parse_positive(Some(raw), DEFAULT_PAGE) >= 1);
    assert!(parse_positive(Some(raw), DEFAULT_LIMIT) >= 1);
});
