use alloc::string::{String, ToString};
use core::{fmt, time::Duration};

use thiserror::Error;

use super::{
    claims::{AUDIENCE, EXPIRATION_TIME, ISSUED_AT, ISSUER, NOT_BEFORE, SUBJECT},
    ClaimTypeError, JsonWebToken,
};
use crate::jws::{self, InvalidSignatureError};

/// The reason a single [`Verifier`] rejected a token.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifierError {
    /// The signature did not verify.
    #[error(transparent)]
    Signature(InvalidSignatureError),
    /// A claim the verifier needs is absent.
    #[error("missing claim `{0}`")]
    MissingClaim(&'static str),
    /// A claim the verifier needs has the wrong shape.
    #[error(transparent)]
    InvalidClaim(#[from] ClaimTypeError),
    /// `iss` is not the expected issuer.
    #[error("expected issuer `{expected}`, got `{actual}`")]
    IssuerMismatch {
        /// The expected issuer.
        expected: String,
        /// The `iss` claim.
        actual: String,
    },
    /// `sub` is not the expected subject.
    #[error("expected subject `{expected}`, got `{actual}`")]
    SubjectMismatch {
        /// The expected subject.
        expected: String,
        /// The `sub` claim.
        actual: String,
    },
    /// `aud` does not contain the expected audience.
    #[error("the token is not intended for `{expected}`")]
    AudienceMismatch {
        /// The expected audience.
        expected: String,
    },
    /// The current time is before `nbf`.
    #[error("the token is not valid before {nbf}")]
    NotYetValid {
        /// The `nbf` claim.
        nbf: u64,
    },
    /// The current time is after `exp`.
    #[error("the token expired at {exp}")]
    Expired {
        /// The `exp` claim.
        exp: u64,
    },
    /// The token was issued too long ago.
    #[error("the token was issued too long ago, at {iat}")]
    TooOld {
        /// The `iat` claim.
        iat: u64,
    },
    /// No system clock is available, and no time was given with `at`.
    #[error("the current time is not available")]
    ClockUnavailable,
    /// A custom verifier failed.
    #[error("{0}")]
    Custom(String),
}

impl VerifierError {
    /// Creates a [`VerifierError::Custom`] for verifiers outside of this crate.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// A check applied to a [`JsonWebToken`] by [`JsonWebToken::verify`].
///
/// Every verifier fails if the claim it looks at is absent. Closures with
/// the signature of [`verify`](Self::verify) are verifiers too.
pub trait Verifier {
    /// Checks the token.
    ///
    /// # Errors
    ///
    /// Returns why the token was rejected.
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError>;
}

impl<F> Verifier for F
where
    F: Fn(&JsonWebToken) -> Result<(), VerifierError>,
{
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        self(token)
    }
}

/// Checks the signature of the token.
pub struct Signature<'a> {
    verifier: &'a dyn jws::Verifier,
}

impl<'a> Signature<'a> {
    /// Uses `verifier` for the signature.
    pub const fn new(verifier: &'a dyn jws::Verifier) -> Self {
        Self { verifier }
    }
}

impl fmt::Debug for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature").finish_non_exhaustive()
    }
}

impl Verifier for Signature<'_> {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        token
            .verify_signature(self.verifier)
            .map_err(VerifierError::Signature)
    }
}

/// Requires `iss` to be the given string.
#[derive(Debug, Clone)]
pub struct Issuer(String);

impl Issuer {
    /// Expects `issuer`.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self(issuer.into())
    }
}

impl Verifier for Issuer {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        let iss = token
            .claims()
            .string(ISSUER)?
            .ok_or(VerifierError::MissingClaim(ISSUER))?;

        if iss == self.0 {
            Ok(())
        } else {
            Err(VerifierError::IssuerMismatch {
                expected: self.0.clone(),
                actual: String::from(iss),
            })
        }
    }
}

/// Requires `sub` to be the given string.
#[derive(Debug, Clone)]
pub struct Subject(String);

impl Subject {
    /// Expects `subject`.
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }
}

impl Verifier for Subject {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        let sub = token
            .claims()
            .string(SUBJECT)?
            .ok_or(VerifierError::MissingClaim(SUBJECT))?;

        if sub == self.0 {
            Ok(())
        } else {
            Err(VerifierError::SubjectMismatch {
                expected: self.0.clone(),
                actual: String::from(sub),
            })
        }
    }
}

/// Requires `aud` to contain the given string. A string `aud` is treated as
/// a list with one element.
#[derive(Debug, Clone)]
pub struct Audience(String);

impl Audience {
    /// Expects `audience`.
    pub fn new(audience: impl Into<String>) -> Self {
        Self(audience.into())
    }
}

impl Verifier for Audience {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        let aud = token
            .claims()
            .string_list(AUDIENCE)?
            .ok_or(VerifierError::MissingClaim(AUDIENCE))?;

        if aud.contains(&self.0.as_str()) {
            Ok(())
        } else {
            Err(VerifierError::AudienceMismatch {
                expected: self.0.clone(),
            })
        }
    }
}

/// Requires `nbf` to have passed, allowing `leeway` of clock skew.
#[derive(Debug, Clone, Copy)]
pub struct NotBefore {
    leeway: Duration,
    now: Option<u64>,
}

impl NotBefore {
    /// Uses the system clock.
    pub const fn new(leeway: Duration) -> Self {
        Self { leeway, now: None }
    }

    /// Uses `now` (seconds since the Unix epoch) instead of the system clock.
    #[must_use]
    pub const fn at(mut self, now: u64) -> Self {
        self.now = Some(now);
        self
    }
}

impl Verifier for NotBefore {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        let nbf = token
            .claims()
            .timestamp(NOT_BEFORE)?
            .ok_or(VerifierError::MissingClaim(NOT_BEFORE))?;
        let now = now(self.now)?;

        if now.saturating_add(self.leeway.as_secs()) < nbf {
            Err(VerifierError::NotYetValid { nbf })
        } else {
            Ok(())
        }
    }
}

/// Requires `exp` to not have passed, allowing `leeway` of clock skew.
#[derive(Debug, Clone, Copy)]
pub struct ExpirationTime {
    leeway: Duration,
    now: Option<u64>,
}

impl ExpirationTime {
    /// Uses the system clock.
    pub const fn new(leeway: Duration) -> Self {
        Self { leeway, now: None }
    }

    /// Uses `now` (seconds since the Unix epoch) instead of the system clock.
    #[must_use]
    pub const fn at(mut self, now: u64) -> Self {
        self.now = Some(now);
        self
    }
}

impl Verifier for ExpirationTime {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        let exp = token
            .claims()
            .timestamp(EXPIRATION_TIME)?
            .ok_or(VerifierError::MissingClaim(EXPIRATION_TIME))?;
        let now = now(self.now)?;

        if now.saturating_sub(self.leeway.as_secs()) > exp {
            Err(VerifierError::Expired { exp })
        } else {
            Ok(())
        }
    }
}

/// Requires `iat` to be at most `max_age` ago.
#[derive(Debug, Clone, Copy)]
pub struct MaxAge {
    max_age: Duration,
    now: Option<u64>,
}

impl MaxAge {
    /// Uses the system clock.
    pub const fn new(max_age: Duration) -> Self {
        Self { max_age, now: None }
    }

    /// Uses `now` (seconds since the Unix epoch) instead of the system clock.
    #[must_use]
    pub const fn at(mut self, now: u64) -> Self {
        self.now = Some(now);
        self
    }
}

impl Verifier for MaxAge {
    fn verify(&self, token: &JsonWebToken) -> Result<(), VerifierError> {
        let iat = token
            .claims()
            .timestamp(ISSUED_AT)?
            .ok_or(VerifierError::MissingClaim(ISSUED_AT))?;
        let now = now(self.now)?;

        // a token issued in the future has age 0
        if now.saturating_sub(iat) > self.max_age.as_secs() {
            Err(VerifierError::TooOld { iat })
        } else {
            Ok(())
        }
    }
}

fn now(pinned: Option<u64>) -> Result<u64, VerifierError> {
    match pinned {
        Some(now) => Ok(now),
        None => system_time(),
    }
}

#[cfg(feature = "std")]
fn system_time() -> Result<u64, VerifierError> {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|since| since.as_secs())
        .map_err(|_| VerifierError::ClockUnavailable)
}

#[cfg(not(feature = "std"))]
fn system_time() -> Result<u64, VerifierError> {
    Err(VerifierError::ClockUnavailable)
}
