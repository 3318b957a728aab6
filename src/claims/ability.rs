//! Net-effective access out of a permitted and a prohibited claim set.

use super::claim_set::ClaimSet;
use super::query::{ClaimData, Query};
use crate::error::ClaimResult;
use crate::key_set::KeySet;
use crate::rules::Rules;

/// A permitted and a prohibited `ClaimSet`, both owned by value.
///
/// Queries are validated once, with the permitted set's rules, and that one normalized
/// query is run against both sets. Serde deserialization validates with the default
/// rules; use `Ability::from_json_str` for abilities built with custom rules.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ability {
    pub permitted: ClaimSet,
    pub prohibited: ClaimSet,
}

impl Ability {
    pub fn new(permitted: ClaimSet, prohibited: ClaimSet) -> Self {
        Ability { permitted, prohibited }
    }

    /// Parses `{"permitted": [...], "prohibited": [...]}`, validating every claim with `rules`.
    pub fn from_json_str(rules: &Rules, json: &str) -> ClaimResult<Self> {
        #[derive(serde::Deserialize)]
        struct Raw {
            permitted: Vec<String>,
            prohibited: Vec<String>,
        }
        let raw: Raw = serde_json::from_str(json)?;
        rules.build_ability(&raw.permitted, &raw.prohibited)
    }

    /// Key for caching decisions: both sets' serialized forms.
    ///
    /// Equal claim content gives an equal key, whatever order the claims were given in.
    pub fn cache_id(&self) -> String {
        format!("({},{})", self.permitted.to_json_string(), self.prohibited.to_json_string())
    }

    /// True if the permitted set checks the query and the prohibited set does not.
    pub fn can<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        let query = self.normalize(query)?;
        Ok(self.permitted.check_data(&query) && !self.prohibited.check_data(&query))
    }

    /// Inverse of `can()`.
    pub fn cannot<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        Ok(!self.can(query)?)
    }

    /// True if a prohibited claim checks the query, regardless of the permitted set.
    pub fn is_explicitly_prohibited<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<bool> {
        let query = self.normalize(query)?;
        Ok(self.prohibited.check_data(&query))
    }

    /// Describes which direct children of the query this ability can reach.
    ///
    /// Permission is looked up through direct descendants, so a grant anywhere below a
    /// child makes the child reachable. Prohibition is looked up through direct children
    /// only, so a prohibition further down does not remove the whole child.
    ///
    /// ```
    /// use claims_core::{build_ability, KeySet};
    ///
    /// let ability = build_ability(
    ///     ["read:clients.*"],
    ///     ["read:clients.first", "read:clients.second"],
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     ability.access_to_resources("read:clients").unwrap(),
    ///     KeySet::all_except_some(["first".to_string(), "second".to_string()]),
    /// );
    /// ```
    pub fn access_to_resources<'q>(
        &self,
        query: impl Into<Query<'q>>,
    ) -> ClaimResult<KeySet<String>> {
        let query = self.normalize(query)?;

        let allowed = if self.permitted.check_data(&query) {
            KeySet::all()
        } else {
            KeySet::some(self.permitted.direct_descendants_data(&query))
        };
        let forbidden = if self.prohibited.check_data(&query) {
            KeySet::all()
        } else {
            KeySet::some(self.prohibited.direct_children_data(&query))
        };

        let access = allowed.remove(&forbidden);
        tracing::debug!(
            verb = %query.verb,
            resource = query.resource.as_deref().unwrap_or("*"),
            access = ?access,
            "computed access to resources"
        );
        Ok(access)
    }

    fn normalize<'q>(&self, query: impl Into<Query<'q>>) -> ClaimResult<ClaimData> {
        query.into().normalize(self.permitted.rules())
    }
}
