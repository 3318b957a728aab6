//! Fixture builders for tests and benchmarks. Only compiled with the `test-utils` feature.
//!
//! Every builder panics on invalid input: fixtures are expected to be valid literals.

use crate::claims::{Ability, ClaimSet};
use crate::rules::Rules;

/// Installs a `tracing` subscriber honouring `RUST_LOG`. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A frozen claim set built with the default rules.
pub fn claim_set(literals: &[&str]) -> ClaimSet {
    Rules::default()
        .build_claim_set(literals.iter().copied())
        .unwrap_or_else(|e| panic!("invalid claim set fixture {literals:?}: {e}"))
}

/// An ability built with the default rules.
pub fn ability(permitted: &[&str], prohibited: &[&str]) -> Ability {
    Ability::new(claim_set(permitted), claim_set(prohibited))
}

/// `count` sibling resources under `parent` (`parent.r0`, `parent.r1`, ...) for `verb`.
pub fn sibling_claims(verb: &str, parent: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{verb}:{parent}.r{i}")).collect()
}
