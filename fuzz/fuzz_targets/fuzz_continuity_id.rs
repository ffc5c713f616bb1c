//! Fuzz target: continuity ID parsing from path and query parameters.

#![no_main]

use launch_core::ContinuityId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(id) = ContinuityId::parse(raw) {
            // Whatever parsed must print back to something that parses the same.
            assert_eq!(ContinuityId::parse(&id.to_string()), Ok(id));
        }
    }
});
