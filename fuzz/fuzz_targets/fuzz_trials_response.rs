//! Fuzz target: origin trials response payload parsing.
//!
//! Upstream payloads are untrusted; parsing must fail with `Malformed`
//! rather than panic.

#![no_main]

use launch_trials::api::{parse_create_response, parse_verify_response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);
    if let Err(e) = parse_verify_response(&body) {
        assert!(e.is_malformed());
    }
    if let Err(e) = parse_create_response(&body) {
        assert!(e.is_malformed());
    }
});
