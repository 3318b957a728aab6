//!
//! Verb registry for claims.
//!
//! A `Rules` value is the configuration every claim, claim set and ability is built with.
//! It is immutable once built and cheap to clone, so it can be shared by every claim
//! produced from it. The crate-wide default is a `LazyLock` constant, never mutated.

use std::sync::{Arc, LazyLock};

use crate::claims::{query, Ability, Claim, ClaimData, ClaimSet, Query};
use crate::error::{ClaimError, ClaimResult};

/// Verbs allowed by `Rules::default()`.
pub const DEFAULT_VERBS: [&str; 6] = ["admin", "read", "delete", "create", "update", "manage"];

/// Verbs allowed by `Rules::basic()`.
pub const BASIC_VERBS: [&str; 2] = ["admin", "read"];

static DEFAULT_RULES: LazyLock<Rules> = LazyLock::new(|| Rules::from_builtin(&DEFAULT_VERBS));

/// The verb enumeration claims are validated against.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RulesConfig", into = "RulesConfig")]
pub struct Rules {
    verbs: Arc<[String]>,
}

/// On-disk shape of a `Rules` configuration: `{"verbs": ["admin", "read"]}`.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesConfig {
    verbs: Vec<String>,
}

impl TryFrom<RulesConfig> for Rules {
    type Error = ClaimError;

    fn try_from(config: RulesConfig) -> Result<Self, Self::Error> {
        Rules::new(config.verbs)
    }
}

impl From<Rules> for RulesConfig {
    fn from(rules: Rules) -> Self {
        RulesConfig {
            verbs: rules.verbs.to_vec(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl Rules {
    /// Builds rules allowing exactly the given verbs. Duplicates are dropped, order is kept.
    ///
    /// Fails with `ClaimError::Config` if the list is empty or a verb is not a plain
    /// literal, since such a verb could never be printed and parsed back as a claim.
    pub fn new<I, S>(verbs: I) -> ClaimResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for verb in verbs {
            let verb = verb.into();
            if !query::is_verb_literal(&verb) {
                return Err(ClaimError::Config(format!(
                    "verb {:?} may only contain ASCII letters, digits, '_' and '-'",
                    verb
                )));
            }
            if !unique.contains(&verb) {
                unique.push(verb);
            }
        }
        if unique.is_empty() {
            return Err(ClaimError::Config("at least one verb is required".into()));
        }
        Ok(Rules {
            verbs: unique.into(),
        })
    }

    /// The two-verb enumeration (`admin`, `read`).
    pub fn basic() -> Self {
        Rules::from_builtin(&BASIC_VERBS)
    }

    // Built-in enumerations are checked by `test_builtin_verbs_are_valid`.
    fn from_builtin(verbs: &[&str]) -> Self {
        Rules {
            verbs: verbs.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Loads rules from a JSON configuration of the form `{"verbs": [...]}`.
    pub fn from_json_str(json: &str) -> ClaimResult<Self> {
        serde_json::from_str(json).map_err(|e| ClaimError::Config(e.to_string()))
    }

    /// The allowed verbs, in configuration order.
    pub fn verbs(&self) -> &[String] {
        &self.verbs
    }

    /// Returns true if the given string is one of the allowed verbs.
    pub fn is_allowed_verb(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v == verb)
    }

    /// Fails with `ClaimError::InvalidVerb` if the verb is not allowed.
    pub fn check_verb(&self, verb: &str) -> ClaimResult<()> {
        if self.is_allowed_verb(verb) {
            return Ok(());
        }
        Err(ClaimError::InvalidVerb {
            verb: verb.to_string(),
            allowed: self.verbs.to_vec(),
        })
    }

    /// Parses a claim literal (`verb:resource`, `verb:resource.*` or `verb:*`).
    pub fn parse(&self, raw: &str) -> ClaimResult<ClaimData> {
        query::parse_claim_string(self, raw)
    }

    /// Tries to parse the given string, returning false instead of an error.
    pub fn is_valid_claim_string(&self, raw: &str) -> bool {
        self.parse(raw).is_ok()
    }

    /// Builds a claim validated against these rules.
    pub fn build_claim<'q>(&self, source: impl Into<Query<'q>>) -> ClaimResult<Claim> {
        let data = source.into().normalize(self)?;
        Claim::new(self.clone(), data.verb, data.resource)
    }

    /// Builds a frozen claim set. Fails on the first invalid entry.
    pub fn build_claim_set<'q, I, Q>(&self, sources: I) -> ClaimResult<ClaimSet>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query<'q>>,
    {
        let claims = sources
            .into_iter()
            .map(|s| self.build_claim(s))
            .collect::<ClaimResult<Vec<_>>>()?;
        Ok(ClaimSet::new(self.clone(), claims))
    }

    /// Builds an ability out of the permitted and prohibited sources.
    pub fn build_ability<'p, 'r, P, PQ, R, RQ>(
        &self,
        permitted: P,
        prohibited: R,
    ) -> ClaimResult<Ability>
    where
        P: IntoIterator<Item = PQ>,
        PQ: Into<Query<'p>>,
        R: IntoIterator<Item = RQ>,
        RQ: Into<Query<'r>>,
    {
        Ok(Ability::new(
            self.build_claim_set(permitted)?,
            self.build_claim_set(prohibited)?,
        ))
    }
}
