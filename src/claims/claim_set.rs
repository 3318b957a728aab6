//! Ordered collections of claims with aggregate queries and guarded mutability.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use super::claim::Claim;
use super::query::{ClaimData, Query};
use crate::error::{ClaimError, ClaimResult};
use crate::rules::Rules;

/// A set of claims kept in canonical order (lexicographic by `Claim::to_string`).
///
/// Sets start frozen. Mutation is only allowed between `unfreeze()` and `freeze()`,
/// and every successful mutation restores canonical order. The serialized form is
/// memoized and dropped on every freeze/unfreeze transition and every mutation.
pub struct ClaimSet {
    claims: Vec<Claim>,
    frozen: bool,
    json: OnceLock<String>,
    rules: Rules,
}

impl ClaimSet {
    /// Builds a frozen set out of already validated claims. Exact duplicates are dropped.
    pub fn new(rules: Rules, mut claims: Vec<Claim>) -> Self {
        sort_canonical(&mut claims);
        claims.dedup();
        ClaimSet {
            claims,
            frozen: true,
            json: OnceLock::new(),
            rules,
        }
    }

    /// Parses the serialized form (a JSON array of claim literals).
    pub fn from_json_str(rules: &Rules, json: &str) -> ClaimResult<Self> {
        let literals: Vec<String> = serde_json::from_str(json)?;
        rules.build_claim_set(&literals)
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Claim> {
        self.claims.iter()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// True if any claim of the set includes the query. Stops at the first match.
    pub fn check<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        let query = self.normalize(query)?;
        Ok(self.check_data(&query))
    }

    /// True if any claim of the set is exactly the query.
    pub fn has_exact<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        let query = self.normalize(query)?;
        Ok(self.has_exact_data(&query))
    }

    /// Sorted, distinct `Claim::direct_child` results of every claim.
    pub fn direct_children<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<Vec<String>> {
        let query = self.normalize(query)?;
        Ok(self.direct_children_data(&query))
    }

    /// Sorted, distinct `Claim::direct_descendant` results of every claim.
    pub fn direct_descendants<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<Vec<String>> {
        let query = self.normalize(query)?;
        Ok(self.direct_descendants_data(&query))
    }

    /// Adds the claim unless the set already checks it (an equal or broader claim exists).
    ///
    /// Returns whether the claim was inserted.
    pub fn add_if_not_checked<'q>(&mut self, claim: impl Into<Query<'q>>) -> ClaimResult<bool> {
        self.ensure_unfrozen()?;
        let candidate = self.normalize(claim)?;
        if self.check_data(&candidate) {
            return Ok(false);
        }
        self.insert(candidate)?;
        Ok(true)
    }

    /// Adds the claim unless an identical claim is already in the set.
    ///
    /// A broader claim does not block the insertion. Returns whether the claim was inserted.
    pub fn add_if_not_exact<'q>(&mut self, claim: impl Into<Query<'q>>) -> ClaimResult<bool> {
        self.ensure_unfrozen()?;
        let candidate = self.normalize(claim)?;
        if self.has_exact_data(&candidate) {
            return Ok(false);
        }
        self.insert(candidate)?;
        Ok(true)
    }

    /// Disallows any change to the set.
    pub fn freeze(&mut self) {
        self.json.take();
        self.frozen = true;
        tracing::debug!(claims = self.claims.len(), "claim set frozen");
    }

    /// Allows changes to the set.
    pub fn unfreeze(&mut self) {
        self.json.take();
        self.frozen = false;
        tracing::debug!(claims = self.claims.len(), "claim set unfrozen");
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// JSON array of the claim literals in canonical order. Computed once, then memoized.
    pub fn to_json_string(&self) -> &str {
        self.json.get_or_init(|| {
            let literals: Vec<String> = self.claims.iter().map(Claim::to_string).collect();
            serde_json::Value::from(literals).to_string()
        })
    }

    fn normalize<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<ClaimData> {
        query.into().normalize(&self.rules)
    }

    fn ensure_unfrozen(&self) -> ClaimResult<()> {
        if self.frozen {
            tracing::trace!("rejected mutation of a frozen claim set");
            return Err(ClaimError::FrozenClaimSet);
        }
        Ok(())
    }

    fn insert(&mut self, data: ClaimData) -> ClaimResult<()> {
        let claim = Claim::new(self.rules.clone(), data.verb, data.resource)?;
        tracing::trace!(claim = %claim, "adding claim to set");
        self.claims.push(claim);
        sort_canonical(&mut self.claims);
        self.json.take();
        Ok(())
    }

    pub(crate) fn check_data(&self, query: &ClaimData) -> bool {
        self.claims.iter().any(|claim| claim.check_data(query))
    }

    pub(crate) fn has_exact_data(&self, query: &ClaimData) -> bool {
        self.claims.iter().any(|claim| claim.is_exact_data(query))
    }

    pub(crate) fn direct_children_data(&self, query: &ClaimData) -> Vec<String> {
        self.collect_segments(query, Claim::direct_child_data)
    }

    pub(crate) fn direct_descendants_data(&self, query: &ClaimData) -> Vec<String> {
        self.collect_segments(query, Claim::direct_descendant_data)
    }

    fn collect_segments<F>(&self, query: &ClaimData, lookup: F) -> Vec<String>
    where
        F: for<'c> Fn(&'c Claim, &ClaimData) -> Option<&'c str>,
    {
        let found: BTreeSet<&str> = self
            .claims
            .iter()
            .filter_map(|claim| lookup(claim, query))
            .collect();
        found.into_iter().map(str::to_string).collect()
    }
}

fn sort_canonical(claims: &mut [Claim]) {
    claims.sort_by_cached_key(Claim::to_string);
}

impl Clone for ClaimSet {
    /// Deep copy of every claim. The copy starts frozen.
    fn clone(&self) -> Self {
        ClaimSet {
            claims: self.claims.clone(),
            frozen: true,
            json: OnceLock::new(),
            rules: self.rules.clone(),
        }
    }
}

impl PartialEq for ClaimSet {
    fn eq(&self, other: &Self) -> bool {
        self.claims == other.claims
    }
}

impl Eq for ClaimSet {}

impl fmt::Debug for ClaimSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimSet")
            .field("claims", &self.claims)
            .field("frozen", &self.frozen)
            .finish()
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

impl serde::Serialize for ClaimSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.claims)
    }
}

impl<'de> serde::Deserialize<'de> for ClaimSet {
    /// Reads an array of claim literals, validated with the default rules. Sets built with
    /// custom rules are read back with `ClaimSet::from_json_str`.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let claims = Vec::<Claim>::deserialize(deserializer)?;
        Ok(ClaimSet::new(Rules::default(), claims))
    }
}
