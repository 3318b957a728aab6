//! Claims, claim sets and abilities.
//!
//! Claims are usually built once from a list of literals through `Rules` (or the
//! crate-level `build_*` helpers, which use the default rules) and then only queried.

pub mod ability;
pub mod claim;
pub mod claim_set;
pub mod query;


pub use ability::Ability;
pub use claim::Claim;
pub use claim_set::ClaimSet;
pub use query::{ClaimData, Query};
