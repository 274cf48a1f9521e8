//! A JSON Web Token (JWT) as defined in [RFC 7519], carried in a compact
//! [`JsonWebSignature`].
//!
//! A token is checked by handing an ordered list of [`Verifier`]s to
//! [`JsonWebToken::verify`]. They run in the given order and the first
//! failure stops the pipeline.
//!
//! [RFC 7519]: <https://datatracker.ietf.org/doc/html/rfc7519>

mod claims;
mod verifier;

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[doc(inline)]
pub use self::{
    claims::{
        ClaimTypeError, Claims, StandardClaims, AUDIENCE, EXPIRATION_TIME, ISSUED_AT, ISSUER,
        JWT_ID, NOT_BEFORE, SUBJECT,
    },
    verifier::{
        Audience, ExpirationTime, Issuer, MaxAge, NotBefore, Signature, Subject, Verifier,
        VerifierError,
    },
};
use crate::jws::{
    self, InvalidSignatureError, JoseHeader, JsonWebSignature, ParseCompactError, SignError,
    Signer,
};

/// An error that can occur while decoding a compact JWT.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The compact JWS could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseCompactError),
    /// The payload is not a JSON object.
    #[error("the payload is not a JSON object: {0}")]
    InvalidClaims(serde_json::Error),
}

/// Returned by [`JsonWebToken::verify`] for the first verifier that failed.
#[derive(Debug, Error)]
#[error("verification failed")]
pub struct VerificationFailed {
    /// The position of the failed verifier in the list.
    pub index: usize,
    /// Why the verifier rejected the token.
    #[source]
    pub cause: VerifierError,
}

/// A JSON Web Token.
///
/// The claims are decoded from the payload once, when the token is signed or
/// decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonWebToken {
    jws: JsonWebSignature,
    claims: Claims,
}

impl JsonWebToken {
    /// Signs `claims` with `signer`, using a header with `typ` set to `JWT`.
    ///
    /// # Errors
    ///
    /// Fails if the claims do not serialize into a JSON object, or the signer
    /// fails.
    pub fn sign<S, T, C>(signer: &T, claims: &C) -> Result<Self, SignError>
    where
        S: AsRef<[u8]>,
        T: Signer<S> + ?Sized,
        C: Serialize + ?Sized,
    {
        Self::sign_with_header(signer, claims, JoseHeader::new().with_type("JWT"))
    }

    /// Signs `claims` with `signer`, using the given header.
    ///
    /// # Errors
    ///
    /// Fails if the claims do not serialize into a JSON object, or the signer
    /// fails.
    pub fn sign_with_header<S, T, C>(
        signer: &T,
        claims: &C,
        header: JoseHeader,
    ) -> Result<Self, SignError>
    where
        S: AsRef<[u8]>,
        T: Signer<S> + ?Sized,
        C: Serialize + ?Sized,
    {
        let Value::Object(claims) =
            serde_json::to_value(claims).map_err(SignError::SerializeClaims)?
        else {
            return Err(SignError::ClaimsNotAnObject);
        };

        let payload = serde_json::to_vec(&claims).map_err(SignError::SerializeClaims)?;
        let jws = JsonWebSignature::sign(signer, payload, header)?;

        Ok(Self {
            jws,
            claims: Claims::from(claims),
        })
    }

    /// Parses a compact JWT. The signature is not checked.
    ///
    /// # Errors
    ///
    /// Fails if the input is not a compact JWS, or the payload is not a JSON
    /// object.
    pub fn decode(input: &str) -> Result<Self, DecodeError> {
        let jws = JsonWebSignature::decode(input)?;

        let claims: Map<String, Value> = serde_json::from_slice(jws.payload()).map_err(|e| {
            debug!("rejected JWT: payload is not a JSON object");
            DecodeError::InvalidClaims(e)
        })?;

        Ok(Self {
            jws,
            claims: Claims::from(claims),
        })
    }

    /// Runs `verifiers` in order, stopping at the first one that fails.
    ///
    /// An empty list accepts every token, so the signature has to be checked
    /// by passing a [`Signature`] verifier.
    ///
    /// # Errors
    ///
    /// Returns the first failure, together with the position of the verifier
    /// that reported it.
    pub fn verify(&self, verifiers: &[&dyn Verifier]) -> Result<(), VerificationFailed> {
        for (index, verifier) in verifiers.iter().enumerate() {
            if let Err(cause) = verifier.verify(self) {
                debug!(index, error = %cause, "JWT verification failed");
                return Err(VerificationFailed { index, cause });
            }
        }

        Ok(())
    }

    /// Checks only the signature.
    ///
    /// # Errors
    ///
    /// Fails if `verifier` rejects the signature.
    pub fn verify_signature(
        &self,
        verifier: &dyn jws::Verifier,
    ) -> Result<(), InvalidSignatureError> {
        self.jws.verify_signature(verifier)
    }

    /// The claims of this token.
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Maps the claims into `T`.
    ///
    /// # Errors
    ///
    /// Fails if the claims do not fit `T`.
    pub fn deserialize_claims<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.jws.payload())
    }

    /// The header of this token.
    pub const fn header(&self) -> &JoseHeader {
        self.jws.header()
    }

    /// The underlying JWS.
    pub const fn jws(&self) -> &JsonWebSignature {
        &self.jws
    }

    /// Splits this token into the JWS and the claims.
    pub fn into_parts(self) -> (JsonWebSignature, Claims) {
        (self.jws, self.claims)
    }
}

impl fmt::Display for JsonWebToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.jws, f)
    }
}

impl FromStr for JsonWebToken {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<JsonWebSignature> for JsonWebToken {
    type Error = serde_json::Error;

    fn try_from(jws: JsonWebSignature) -> Result<Self, Self::Error> {
        let claims: Map<String, Value> = serde_json::from_slice(jws.payload())?;

        Ok(Self {
            jws,
            claims: Claims::from(claims),
        })
    }
}
