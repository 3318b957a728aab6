#![no_main]

// Harness: parse_claim
// Arbitrary strings must never panic the parser, and every accepted literal
// must print back to a literal that parses to the same claim.

use libfuzzer_sys::fuzz_target;
use claims_core::{build_claim, is_valid_claim_string};

fuzz_target!(|raw: &str| {
    let valid = is_valid_claim_string(raw);
    match build_claim(raw) {
        Ok(claim) => {
            assert!(valid);
            let printed = claim.to_string();
            let reparsed = build_claim(printed.as_str()).expect("printed claim parses");
            assert_eq!(reparsed, claim);
            assert_eq!(reparsed.to_string(), printed);
        }
        Err(_) => assert!(!valid),
    }
});
