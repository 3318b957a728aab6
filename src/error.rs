//!
//! Defines error types for claim parsing, claim set mutation and rules configuration.

/// Result type for every fallible claim operation.
pub type ClaimResult<T> = Result<T, ClaimError>;

/// Represents errors that can occur while building or querying claims, claim sets and abilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    /// The verb is not part of the verb enumeration of the active `Rules`.
    #[error("the given verb '{verb}' is not one of the allowed verbs: {allowed:?}")]
    InvalidVerb {
        verb: String,
        allowed: Vec<String>,
    },
    /// The raw string (or resource) cannot be parsed as a claim.
    #[error("the given raw string cannot be parsed as a claim: {raw:?}")]
    InvalidPattern { raw: String },
    /// A mutation was attempted on a frozen `ClaimSet`.
    #[error("ClaimSet is frozen")]
    FrozenClaimSet,
    /// The rules configuration could not be loaded.
    #[error("invalid rules configuration: {0}")]
    Config(String),
    /// A serialized claim set or ability is not valid JSON of the expected shape.
    #[error("invalid serialized form: {0}")]
    Json(String),
}

impl ClaimError {
    pub(crate) fn invalid_pattern(raw: impl Into<String>) -> Self {
        ClaimError::InvalidPattern { raw: raw.into() }
    }
}

impl From<serde_json::Error> for ClaimError {
    fn from(err: serde_json::Error) -> Self {
        ClaimError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_verb_message_lists_allowed_verbs() {
        let err = ClaimError::InvalidVerb {
            verb: "blah".into(),
            allowed: vec!["admin".into(), "read".into()],
        };
        assert_eq!(
            err.to_string(),
            r#"the given verb 'blah' is not one of the allowed verbs: ["admin", "read"]"#
        );
    }

    #[test]
    fn test_invalid_pattern_quotes_raw_string() {
        let err = ClaimError::invalid_pattern("read:a..b");
        assert_eq!(err.to_string(), r#"the given raw string cannot be parsed as a claim: "read:a..b""#);
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err: ClaimError = parse_err.into();
        assert!(matches!(err, ClaimError::Json(_)));
    }
}
