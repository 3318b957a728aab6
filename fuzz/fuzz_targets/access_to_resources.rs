#![no_main]

// Harness: access_to_resources
// Builds abilities out of small generated paths and checks that the access set
// agrees with `can` for every direct child that appears in either claim set.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use claims_core::{build_ability, KeySet};

const SEGMENTS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Arbitrary, Debug, Clone)]
struct AccessFrame {
    permitted: Vec<Vec<u8>>,
    prohibited: Vec<Vec<u8>>,
    query: Vec<u8>,
}

fn literal(path: &[u8]) -> String {
    if path.is_empty() {
        return "read:*".to_string();
    }
    let segments: Vec<&str> = path.iter().take(4).map(|b| SEGMENTS[*b as usize % 4]).collect();
    format!("read:{}", segments.join("."))
}

fuzz_target!(|frame: AccessFrame| {
    let permitted: Vec<String> = frame.permitted.iter().take(8).map(|p| literal(p)).collect();
    let prohibited: Vec<String> = frame.prohibited.iter().take(8).map(|p| literal(p)).collect();
    let query = literal(&frame.query);

    let ability = build_ability(&permitted, &prohibited).expect("generated literals are valid");
    let access = ability.access_to_resources(query.as_str()).expect("generated query is valid");

    // Nothing is reachable below a query the prohibited set fully covers.
    if ability.is_explicitly_prohibited(query.as_str()).unwrap() {
        assert_eq!(access, KeySet::None);
    }

    // A child both reachable and directly allowed must not be listed as excluded.
    for segment in SEGMENTS {
        let child = if query == "read:*" {
            format!("read:{segment}")
        } else {
            format!("{query}.{segment}")
        };
        if ability.can(child.as_str()).unwrap() {
            assert!(access.contains(&segment.to_string()), "{child} allowed but missing from {access:?}");
        }
    }
});
