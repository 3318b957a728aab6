//! Query normalization and the claim literal grammar.
//!
//! Every operation that accepts a query takes `impl Into<Query>`: a literal string
//! (`"read:clients.first"`, `"read:clients.*"`, `"read:*"`), a `ClaimData` record or
//! an existing `Claim`. All of them normalize to one `ClaimData` before any comparison.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::claim::Claim;
use crate::error::{ClaimError, ClaimResult};
use crate::rules::Rules;

/// Separator between resource path segments.
pub const SEPARATOR: char = '.';

/// Resource placeholder used by the literal form of a global claim.
pub const GLOBAL_WILDCARD: &str = "*";

const WILDCARD_SUFFIX: &str = ".*";

static VERB_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("verb regex is valid"));

// Segments are ASCII word characters or hyphens.
static RESOURCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("resource regex is valid")
});

/// The normalized `{verb, resource}` pair. A `None` resource means global.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ClaimData {
    pub verb: String,
    #[serde(default)]
    pub resource: Option<String>,
}

impl ClaimData {
    pub fn new(verb: impl Into<String>, resource: Option<impl Into<String>>) -> Self {
        ClaimData {
            verb: verb.into(),
            resource: resource.map(Into::into),
        }
    }

    /// A record for every resource under the given verb.
    pub fn global(verb: impl Into<String>) -> Self {
        ClaimData {
            verb: verb.into(),
            resource: None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.resource.is_none()
    }
}

/// Any of the accepted query shapes.
#[derive(Debug, Clone)]
pub enum Query<'a> {
    /// A claim literal, parsed with the active rules.
    Literal(&'a str),
    /// A loosely structured record. An empty resource string means global.
    Record(Cow<'a, ClaimData>),
    /// An already built claim.
    Claim(&'a Claim),
}

impl<'a> Query<'a> {
    /// Reduces the query to its `{verb, resource}` pair, validating it against `rules`.
    pub fn normalize(self, rules: &Rules) -> ClaimResult<ClaimData> {
        let result = match self {
            Query::Literal(raw) => parse_claim_string(rules, raw),
            Query::Record(data) => normalize_record(rules, data.into_owned()),
            Query::Claim(claim) => Ok(ClaimData {
                verb: claim.verb().to_string(),
                resource: claim.resource().map(str::to_string),
            }),
        };
        if let Err(err) = &result {
            tracing::trace!(error = %err, "query rejected");
        }
        result
    }
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(raw: &'a str) -> Self {
        Query::Literal(raw)
    }
}

impl<'a> From<&'a String> for Query<'a> {
    fn from(raw: &'a String) -> Self {
        Query::Literal(raw.as_str())
    }
}

impl<'a> From<&'a Claim> for Query<'a> {
    fn from(claim: &'a Claim) -> Self {
        Query::Claim(claim)
    }
}

impl<'a> From<&'a ClaimData> for Query<'a> {
    fn from(data: &'a ClaimData) -> Self {
        Query::Record(Cow::Borrowed(data))
    }
}

impl From<ClaimData> for Query<'_> {
    fn from(data: ClaimData) -> Self {
        Query::Record(Cow::Owned(data))
    }
}

fn normalize_record(rules: &Rules, data: ClaimData) -> ClaimResult<ClaimData> {
    rules.check_verb(&data.verb)?;
    let resource = data.resource.filter(|r| !r.is_empty());
    if let Some(resource) = &resource {
        if !is_resource_path(resource) {
            return Err(ClaimError::invalid_pattern(resource.as_str()));
        }
    }
    Ok(ClaimData {
        verb: data.verb,
        resource,
    })
}

/// Parses `verb:*`, `verb:some.resource` or `verb:some.resource.*`.
///
/// The trailing `.*` is accepted and dropped. The verb is only checked against
/// `rules` once the literal is well formed, so a malformed literal is always
/// reported as `InvalidPattern`.
pub(crate) fn parse_claim_string(rules: &Rules, raw: &str) -> ClaimResult<ClaimData> {
    let (verb, rest) = raw
        .split_once(':')
        .ok_or_else(|| ClaimError::invalid_pattern(raw))?;
    if !is_verb_literal(verb) {
        return Err(ClaimError::invalid_pattern(raw));
    }

    if rest == GLOBAL_WILDCARD {
        rules.check_verb(verb)?;
        return Ok(ClaimData::global(verb));
    }

    let resource = rest.strip_suffix(WILDCARD_SUFFIX).unwrap_or(rest);
    if !is_resource_path(resource) {
        return Err(ClaimError::invalid_pattern(raw));
    }
    rules.check_verb(verb)?;
    Ok(ClaimData {
        verb: verb.to_string(),
        resource: Some(resource.to_string()),
    })
}

pub(crate) fn is_verb_literal(verb: &str) -> bool {
    VERB_REGEX.is_match(verb)
}

/// True for a non-empty, dot-delimited path of non-empty segments ending in a word character.
pub(crate) fn is_resource_path(resource: &str) -> bool {
    RESOURCE_REGEX.is_match(resource) && !resource.ends_with('-')
}

/// Splits a resource into its segments; a global resource has none.
pub(crate) fn parts_from_resource(resource: Option<&str>) -> Vec<&str> {
    match resource {
        Some(r) => r.split(SEPARATOR).collect(),
        None => Vec::new(),
    }
}

/// True if `resource` lies strictly below `ancestor`, on a segment boundary.
pub(crate) fn is_strict_descendant(resource: &str, ancestor: &str) -> bool {
    resource.len() > ancestor.len()
        && resource.starts_with(ancestor)
        && resource[ancestor.len()..].starts_with(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ClaimResult<ClaimData> {
        parse_claim_string(&Rules::default(), raw)
    }

    #[test]
    fn test_parse_global() {
        assert_eq!(parse("read:*").unwrap(), ClaimData::global("read"));
    }

    #[test]
    fn test_parse_resource_and_wildcard_suffix() {
        assert_eq!(parse("admin:what").unwrap(), ClaimData::new("admin", Some("what")));
        assert_eq!(parse("admin:what.*").unwrap(), ClaimData::new("admin", Some("what")));
        assert_eq!(
            parse("read:some_thing.other-thing.x1").unwrap(),
            ClaimData::new("read", Some("some_thing.other-thing.x1"))
        );
    }

    #[test]
    fn test_parse_unknown_verb() {
        assert!(matches!(parse("blah:what"), Err(ClaimError::InvalidVerb { ref verb, .. }) if verb == "blah"));
        assert!(matches!(parse("blah:*"), Err(ClaimError::InvalidVerb { .. })));
    }

    #[test]
    fn test_parse_rejects_malformed_literals() {
        for raw in [
            "",
            "read",
            "read:",
            ":what",
            "read:a..b",
            "read:.a",
            "read:a.",
            "read:a.b-",
            "read:a b",
            "read:a/b",
            "read:.*",
            "read:*.*",
            "read:a.*.b",
            "re ad:a",
        ] {
            assert_eq!(parse(raw), Err(ClaimError::invalid_pattern(raw)), "{raw:?}");
        }
    }

    #[test]
    fn test_malformed_literal_with_unknown_verb_is_a_pattern_error() {
        assert!(matches!(parse("blah:a..b"), Err(ClaimError::InvalidPattern { .. })));
    }

    #[test]
    fn test_record_normalization() {
        let rules = Rules::default();
        let data = ClaimData::new("read", Some(""));
        assert_eq!(Query::from(&data).normalize(&rules).unwrap(), ClaimData::global("read"));

        let bad_verb = ClaimData::new("nope", Some("clients"));
        assert!(matches!(
            Query::from(bad_verb).normalize(&rules),
            Err(ClaimError::InvalidVerb { .. })
        ));

        let bad_resource = ClaimData::new("read", Some("clients..first"));
        assert!(matches!(
            Query::from(bad_resource).normalize(&rules),
            Err(ClaimError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_all_shapes_normalize_alike() {
        let rules = Rules::default();
        let claim = rules.build_claim("read:clients.first").unwrap();
        let record = ClaimData::new("read", Some("clients.first"));

        let from_literal = Query::from("read:clients.first").normalize(&rules).unwrap();
        let from_record = Query::from(&record).normalize(&rules).unwrap();
        let from_claim = Query::from(&claim).normalize(&rules).unwrap();

        assert_eq!(from_literal, from_record);
        assert_eq!(from_record, from_claim);
    }

    #[test]
    fn test_is_strict_descendant_is_segment_aligned() {
        assert!(is_strict_descendant("clients.first", "clients"));
        assert!(!is_strict_descendant("clients.first", "client"));
        assert!(!is_strict_descendant("clients", "clients"));
        assert!(!is_strict_descendant("clients", "clients.first"));
    }

    #[test]
    fn test_parts_from_resource() {
        assert!(parts_from_resource(None).is_empty());
        assert_eq!(parts_from_resource(Some("a.b.c")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_claim_data_deserializes_without_resource() {
        let data: ClaimData = serde_json::from_str(r#"{"verb": "read"}"#).unwrap();
        assert!(data.is_global());
    }
}
