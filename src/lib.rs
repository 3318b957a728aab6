#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Claims-Core is a hierarchical, claim-based authorization core.
//!
//! A claim grants a verb over a dot-delimited resource path (`read:clients.first`) or over
//! every resource for that verb (`read:*`). Claims are combined into permitted and
//! prohibited sets, and an `Ability` derives yes/no decisions and the set of direct
//! child resources that stay reachable once partial prohibitions are applied.
//!
//! ```
//! use claims_core::{build_ability, KeySet};
//!
//! let ability = build_ability(
//!     ["read:clients.first.some.stuff", "read:clients.third.other.things"],
//!     ["read:clients.first", "read:clients.second"],
//! )
//! .unwrap();
//!
//! assert!(ability.can("read:clients.third.other.things.deep").unwrap());
//! assert!(ability.cannot("read:clients.first.some.stuff").unwrap());
//! assert_eq!(
//!     ability.access_to_resources("read:clients").unwrap(),
//!     KeySet::some(["third".to_string()]),
//! );
//! ```

// Verb registry, the configuration every claim is validated against.
pub mod rules;

// Claim, ClaimSet, Ability and query normalization.
pub mod claims;

// Set algebra returned by `Ability::access_to_resources`.
pub mod key_set;

// Error types.
pub mod error;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use claims::{Ability, Claim, ClaimData, ClaimSet, Query};
pub use error::{ClaimError, ClaimResult};
pub use key_set::KeySet;
pub use rules::{Rules, BASIC_VERBS, DEFAULT_VERBS};

/// The verbs allowed by the default rules.
pub const ALLOWED_VERBS: [&str; 6] = DEFAULT_VERBS;

/// Builds a claim with the default rules.
pub fn build_claim<'q>(source: impl Into<Query<'q>>) -> ClaimResult<Claim> {
    Rules::default().build_claim(source)
}

/// Builds a frozen claim set with the default rules.
pub fn build_claim_set<'q, I, Q>(sources: I) -> ClaimResult<ClaimSet>
where
    I: IntoIterator<Item = Q>,
    Q: Into<Query<'q>>,
{
    Rules::default().build_claim_set(sources)
}

/// Builds an ability with the default rules.
pub fn build_ability<'p, 'r, P, PQ, R, RQ>(permitted: P, prohibited: R) -> ClaimResult<Ability>
where
    P: IntoIterator<Item = PQ>,
    PQ: Into<Query<'p>>,
    R: IntoIterator<Item = RQ>,
    RQ: Into<Query<'r>>,
{
    Rules::default().build_ability(permitted, prohibited)
}

/// True if the string parses as a claim under the default rules. Never fails.
pub fn is_valid_claim_string(raw: &str) -> bool {
    Rules::default().is_valid_claim_string(raw)
}

/// True if the verb is allowed by the default rules.
pub fn is_allowed_verb(verb: &str) -> bool {
    Rules::default().is_allowed_verb(verb)
}
