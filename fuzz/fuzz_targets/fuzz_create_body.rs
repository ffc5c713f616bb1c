//! Fuzz target: parsing and validation of the create-launch-issue body.
//!
//! Arbitrary bytes must never panic; every input ends in a request or an
//! `InvalidRequest`, and both ID accessors return `Ok` or a `CoreError`.

#![no_main]

use launch_gateway::routes::CreateLaunchIssueRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = CreateLaunchIssueRequest::from_body(data) {
        let _ = request.feature_id();
        let _ = request.gate_id();
    }
});
