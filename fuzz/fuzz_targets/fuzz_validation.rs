//! Fuzz product payload validation.
//!
//! Any byte string that parses as JSON is fed through both presence modes and
//! through field parsing. None of them may panic, and a payload that passes
//! full validation must also parse into product fields.
//!
//! ```bash
//! cargo +nightly fuzz run fuzz_validation -- -max_total_time=60
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use product_api::validation::{Presence, parse_product_fields, validate_product};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let _ = validate_product(&payload, Presence::PresentOnly);

    let full = validate_product(&payload, Presence::RequireAll);
    let parsed = parse_product_fields(payload);
    assert_eq!(full.is_ok(), parsed.is_ok());

    if let Ok(fields) = parsed {
        assert!(!fields.name.trim().is_empty());
        assert!(fields.price.is_finite());
    }
});
