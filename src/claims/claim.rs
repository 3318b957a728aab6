//! The single-claim matching algorithm.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use super::query::{self, ClaimData, Query, GLOBAL_WILDCARD};
use crate::error::{ClaimError, ClaimResult};
use crate::rules::Rules;

/// One permission atom: a verb over a resource path, or over every resource when global.
///
/// Equality and hashing only look at verb and resource; ordering follows the
/// canonical string form (`verb:resource` / `verb:*`).
pub struct Claim {
    verb: String,
    resource: Option<String>,
    /// Segments of `resource`, computed on first use.
    parts: OnceLock<Vec<String>>,
    rules: Rules,
}

impl Claim {
    /// Builds a claim, validating the verb against `rules` and the resource against the
    /// path grammar.
    pub fn new(
        rules: Rules,
        verb: impl Into<String>,
        resource: Option<String>,
    ) -> ClaimResult<Self> {
        let verb = verb.into();
        rules.check_verb(&verb)?;
        if let Some(resource) = &resource {
            if !query::is_resource_path(resource) {
                return Err(ClaimError::invalid_pattern(resource.as_str()));
            }
        }
        Ok(Claim {
            verb,
            resource,
            parts: OnceLock::new(),
            rules,
        })
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The resource path, or `None` for a global claim.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The rules this claim was validated with; used to normalize literal queries.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The `{verb, resource}` record of this claim.
    pub fn to_data(&self) -> ClaimData {
        ClaimData {
            verb: self.verb.clone(),
            resource: self.resource.clone(),
        }
    }

    /// True if the given verb is the same as the claim's.
    pub fn has_verb(&self, verb: &str) -> bool {
        self.verb == verb
    }

    /// True if the claim has no resource: it covers every resource for its verb.
    pub fn is_global(&self) -> bool {
        self.resource.is_none()
    }

    /// True if this claim includes the given query (same resource or any resource below it).
    pub fn check<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        let query = self.normalize(query)?;
        Ok(self.check_data(&query))
    }

    /// True if this claim represents exactly the given query.
    pub fn is_exact<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        let query = self.normalize(query)?;
        Ok(self.is_exact_data(&query))
    }

    /// If this claim is exactly one segment below the query, returns that segment.
    ///
    /// ```
    /// use claims_core::build_claim;
    ///
    /// let claim = build_claim("read:what.some.stuff").unwrap();
    /// assert_eq!(claim.direct_child("admin:*").unwrap(), None);
    /// assert_eq!(claim.direct_child("read:*").unwrap(), None);
    /// assert_eq!(claim.direct_child("read:what").unwrap(), None);
    /// assert_eq!(claim.direct_child("read:what.some").unwrap(), Some("stuff"));
    /// assert_eq!(claim.direct_child("read:what.some.stuff").unwrap(), None);
    /// ```
    pub fn direct_child<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<Option<&str>> {
        let query = self.normalize(query)?;
        Ok(self.direct_child_data(&query))
    }

    pub fn is_direct_child<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        Ok(self.direct_child(query)?.is_some())
    }

    /// If this claim lies anywhere below the query, returns the first segment after the query path.
    ///
    /// ```
    /// use claims_core::build_claim;
    ///
    /// let claim = build_claim("read:what.some.stuff").unwrap();
    /// assert_eq!(claim.direct_descendant("admin:*").unwrap(), None);
    /// assert_eq!(claim.direct_descendant("read:*").unwrap(), Some("what"));
    /// assert_eq!(claim.direct_descendant("read:what").unwrap(), Some("some"));
    /// assert_eq!(claim.direct_descendant("read:what.some").unwrap(), Some("stuff"));
    /// assert_eq!(claim.direct_descendant("read:what.some.stuff").unwrap(), None);
    /// ```
    pub fn direct_descendant<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<Option<&str>> {
        let query = self.normalize(query)?;
        Ok(self.direct_descendant_data(&query))
    }

    pub fn is_direct_descendant<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        Ok(self.direct_descendant(query)?.is_some())
    }

    fn normalize<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<ClaimData> {
        query.into().normalize(&self.rules)
    }

    fn parts(&self) -> &[String] {
        self.parts.get_or_init(|| {
            query::parts_from_resource(self.resource.as_deref())
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    pub(crate) fn check_data(&self, query: &ClaimData) -> bool {
        if !self.has_verb(&query.verb) {
            return false;
        }
        let Some(own) = self.resource.as_deref() else {
            return true;
        };
        match query.resource.as_deref() {
            None => false,
            Some(resource) => resource == own || query::is_strict_descendant(resource, own),
        }
    }

    pub(crate) fn is_exact_data(&self, query: &ClaimData) -> bool {
        self.has_verb(&query.verb) && self.resource == query.resource
    }

    pub(crate) fn direct_child_data(&self, query: &ClaimData) -> Option<&str> {
        let own = self.resource.as_deref()?;
        if !self.has_verb(&query.verb) {
            return None;
        }
        let query_depth = query::parts_from_resource(query.resource.as_deref()).len();
        let parts = self.parts();
        if parts.len() != query_depth + 1 {
            return None;
        }
        match query.resource.as_deref() {
            None => parts.first().map(String::as_str),
            Some(resource) if query::is_strict_descendant(own, resource) => {
                parts.last().map(String::as_str)
            }
            Some(_) => None,
        }
    }

    pub(crate) fn direct_descendant_data(&self, query: &ClaimData) -> Option<&str> {
        let own = self.resource.as_deref()?;
        if !self.has_verb(&query.verb) {
            return None;
        }
        let parts = self.parts();
        match query.resource.as_deref() {
            None => parts.first().map(String::as_str),
            Some(resource) if query::is_strict_descendant(own, resource) => {
                let index = query::parts_from_resource(Some(resource)).len();
                parts.get(index).map(String::as_str)
            }
            Some(_) => None,
        }
    }
}

impl Clone for Claim {
    /// Independent copy; the segment cache is recomputed lazily by the copy.
    fn clone(&self) -> Self {
        Claim {
            verb: self.verb.clone(),
            resource: self.resource.clone(),
            parts: OnceLock::new(),
            rules: self.rules.clone(),
        }
    }
}

impl fmt::Display for Claim {
    /// `verb:resource`, or `verb:*` if global.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resource = self.resource.as_deref().unwrap_or(GLOBAL_WILDCARD);
        write!(f, "{}:{}", self.verb, resource)
    }
}

impl fmt::Debug for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Claim").field(&self.to_string()).finish()
    }
}

impl PartialEq for Claim {
    fn eq(&self, other: &Self) -> bool {
        self.verb == other.verb && self.resource == other.resource
    }
}

impl Eq for Claim {}

impl Hash for Claim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.verb.hash(state);
        self.resource.hash(state);
    }
}

impl PartialOrd for Claim {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Claim {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl std::str::FromStr for Claim {
    type Err = ClaimError;

    /// Parses a claim literal with the default rules.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rules::default().build_claim(s)
    }
}

impl serde::Serialize for Claim {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Claim {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
