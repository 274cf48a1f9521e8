use alloc::{string::String, vec::Vec};
use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// `iss` claim name
pub const ISSUER: &str = "iss";
/// `sub` claim name
pub const SUBJECT: &str = "sub";
/// `aud` claim name
pub const AUDIENCE: &str = "aud";
/// `exp` claim name
pub const EXPIRATION_TIME: &str = "exp";
/// `nbf` claim name
pub const NOT_BEFORE: &str = "nbf";
/// `iat` claim name
pub const ISSUED_AT: &str = "iat";
/// `jti` claim name
pub const JWT_ID: &str = "jti";

/// A claim is present, but has a different shape than the accessor needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("claim `{claim}` must be {expected}")]
pub struct ClaimTypeError {
    /// The name of the claim.
    pub claim: String,
    /// What was expected, e.g. "a string".
    pub expected: &'static str,
}

impl ClaimTypeError {
    fn new(claim: &str, expected: &'static str) -> Self {
        Self {
            claim: String::from(claim),
            expected,
        }
    }
}

/// The claims of a JSON Web Token, exactly as they were decoded.
///
/// The typed accessors return `Ok(None)` if the claim is absent, and an
/// error if it is present with the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// The raw value of a claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns `true` if the claim is present, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// A claim that must be a string.
    ///
    /// # Errors
    ///
    /// Fails if the claim is present but not a string.
    pub fn string(&self, name: &str) -> Result<Option<&str>, ClaimTypeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ClaimTypeError::new(name, "a string")),
        }
    }

    /// A claim that must be a number. Fractions are truncated towards zero,
    /// values outside of `i64` saturate.
    ///
    /// # Errors
    ///
    /// Fails if the claim is present but not a number.
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ClaimTypeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None => n
                    .as_f64()
                    .map(|f| Some(f as i64))
                    .ok_or_else(|| ClaimTypeError::new(name, "a number")),
            },
            Some(_) => Err(ClaimTypeError::new(name, "a number")),
        }
    }

    /// A claim that must be a `NumericDate`, seconds since the Unix epoch.
    /// Fractions are truncated.
    ///
    /// # Errors
    ///
    /// Fails if the claim is present but not a non-negative number.
    pub fn timestamp(&self, name: &str) -> Result<Option<u64>, ClaimTypeError> {
        let expected = "a non-negative number";

        let n = match self.get(name) {
            None => return Ok(None),
            Some(Value::Number(n)) => n,
            Some(_) => return Err(ClaimTypeError::new(name, expected)),
        };

        if let Some(t) = n.as_u64() {
            return Ok(Some(t));
        }

        match n.as_f64() {
            // `as` saturates, so anything past the last integer is rejected
            Some(f) if f >= 0.0 && f < u64::MAX as f64 => Ok(Some(f as u64)),
            _ => Err(ClaimTypeError::new(name, expected)),
        }
    }

    /// A claim that must be a list of strings. A single string counts as a
    /// list with one element, which is what `aud` commonly looks like.
    ///
    /// # Errors
    ///
    /// Fails if the claim is present but neither a string nor a list of
    /// strings.
    pub fn string_list(&self, name: &str) -> Result<Option<Vec<&str>>, ClaimTypeError> {
        let expected = "a string or a list of strings";

        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(alloc::vec![s.as_str()])),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| match value {
                    Value::String(s) => Ok(s.as_str()),
                    _ => Err(ClaimTypeError::new(name, expected)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(ClaimTypeError::new(name, expected)),
        }
    }

    /// Iterates over all claims.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The underlying JSON object.
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Turns this into the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

/// The registered claims of [section 4.1 of RFC 7519], for building or
/// reading tokens that only need those.
///
/// [section 4.1 of RFC 7519]: <https://datatracker.ietf.org/doc/html/rfc7519#section-4.1>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// `iss`
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// `sub`
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// `aud`, always serialized as a list
    #[serde(
        rename = "aud",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_audience"
    )]
    pub audience: Option<Vec<String>>,
    /// `exp`
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<u64>,
    /// `nbf`
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<u64>,
    /// `iat`
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<u64>,
    /// `jti`
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl StandardClaims {
    /// Creates a claim set without any claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `iss`.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets `sub`.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets `aud`.
    #[must_use]
    pub fn with_audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = Some(audience.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `exp`.
    #[must_use]
    pub const fn with_expiration_time(mut self, exp: u64) -> Self {
        self.expiration_time = Some(exp);
        self
    }

    /// Sets `nbf`.
    #[must_use]
    pub const fn with_not_before(mut self, nbf: u64) -> Self {
        self.not_before = Some(nbf);
        self
    }

    /// Sets `iat`.
    #[must_use]
    pub const fn with_issued_at(mut self, iat: u64) -> Self {
        self.issued_at = Some(iat);
        self
    }

    /// Sets `jti`.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

fn deserialize_audience<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(aud)) => Some(alloc::vec![aud]),
        Some(OneOrMany::Many(aud)) => Some(aud),
    })
}

impl fmt::Display for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claims(value: Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn absent_claims_are_none() {
        let claims = Claims::new();
        assert_eq!(claims.string(ISSUER), Ok(None));
        assert_eq!(claims.integer(EXPIRATION_TIME), Ok(None));
        assert_eq!(claims.timestamp(EXPIRATION_TIME), Ok(None));
        assert_eq!(claims.string_list(AUDIENCE), Ok(None));
        assert!(!claims.contains(ISSUER));
    }

    #[test]
    fn strings() {
        let claims = claims(json!({ "iss": "me", "sub": 1, "null": null }));
        assert_eq!(claims.string(ISSUER), Ok(Some("me")));
        assert!(claims.string(SUBJECT).is_err());
        assert!(claims.string("null").is_err());
        assert!(claims.contains("null"));
    }

    #[test]
    fn numbers_are_coerced() {
        let claims = claims(json!({
            "int": 7,
            "neg": -3,
            "float": 12.9,
            "negfloat": -1.5,
            "str": "1700000000",
        }));

        assert_eq!(claims.integer("int"), Ok(Some(7)));
        assert_eq!(claims.integer("float"), Ok(Some(12)));
        assert_eq!(claims.integer("negfloat"), Ok(Some(-1)));
        assert!(claims.integer("str").is_err());

        assert_eq!(claims.timestamp("int"), Ok(Some(7)));
        assert_eq!(claims.timestamp("float"), Ok(Some(12)));
        assert!(claims.timestamp("neg").is_err());
        assert!(claims.timestamp("str").is_err());
    }

    #[test]
    fn out_of_range_timestamps_are_rejected() {
        let claims = claims(json!({
            "huge": 1e300,
            "edge": 18446744073709551615.0,
            "big": 4102444800.5,
        }));

        assert_eq!(
            claims.timestamp("huge"),
            Err(ClaimTypeError::new("huge", "a non-negative number"))
        );
        assert!(claims.timestamp("edge").is_err());
        assert_eq!(claims.timestamp("big"), Ok(Some(4_102_444_800)));
    }

    #[test]
    fn audience_is_a_list() {
        let single = claims(json!({ "aud": "app" }));
        assert_eq!(single.string_list(AUDIENCE), Ok(Some(alloc::vec!["app"])));

        let many = claims(json!({ "aud": ["app", "api"] }));
        assert_eq!(many.string_list(AUDIENCE), Ok(Some(alloc::vec!["app", "api"])));

        let err = claims(json!({ "aud": ["app", 1] }))
            .string_list(AUDIENCE)
            .unwrap_err();
        assert_eq!(err.claim, "aud");
        assert!(claims(json!({ "aud": {} })).string_list(AUDIENCE).is_err());
    }

    #[test]
    fn standard_claims() {
        let claims = StandardClaims::new()
            .with_issuer("oauth-server")
            .with_audience(["app"])
            .with_expiration_time(10);
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({ "iss": "oauth-server", "aud": ["app"], "exp": 10 })
        );

        let decoded: StandardClaims = serde_json::from_value(json!({ "aud": "app" })).unwrap();
        assert_eq!(decoded.audience, Some(alloc::vec![String::from("app")]));
        assert!(serde_json::from_value::<StandardClaims>(json!({ "aud": 1 })).is_err());
    }
}
