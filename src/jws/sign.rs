use thiserror::Error;

use crate::{crypto, jwa::JsonWebSigningAlgorithm};

/// This trait represents anything that can be used to sign a JWS.
///
/// To be able to be used as a [`Signer`], one must provide the [sign operation]
/// itself, and also needs to [specify the algorithm] used for signing. The
/// algorithm will be used as the value for the `alg` field inside the
/// [`JoseHeader`](super::JoseHeader) of the signed value.
///
/// A signer is bound to exactly one algorithm and holds no mutable state, so
/// one instance can be shared between threads and reused for any number of
/// signatures.
///
/// [sign operation]: Signer::sign
/// [specify the algorithm]: Signer::algorithm
pub trait Signer<S: AsRef<[u8]>>: Send + Sync {
    /// Sign the given bytestring using this signer and return the signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing operation fails.
    /// An error usually only appears when communicating with external signers
    /// or if the randomness source failed.
    fn sign(&self, msg: &[u8]) -> Result<S, crypto::Error>;

    /// Return the type of signing algorithm used by this signer.
    fn algorithm(&self) -> JsonWebSigningAlgorithm;

    /// JsonWebSignatures *can* contain a key id which is specified
    /// by this method.
    fn key_id(&self) -> Option<&str> {
        None
    }
}

/// An error used if [`FromKey`] expected a different algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid algorithm")]
pub struct InvalidSigningAlgorithmError;

/// A trait for a [`Signer`] or [`Verifier`](super::Verifier) to implement if
/// it can be created from key material as long as the algorithm is known
pub trait FromKey<K>: Sized {
    /// The error returned if the conversion failed
    type Error;

    /// Turn `K` into `Self`, bound to `alg`.
    ///
    /// # Errors
    ///
    /// Returns an error if `alg` can not be used with this key type.
    fn from_key(key: K, alg: JsonWebSigningAlgorithm) -> Result<Self, Self::Error>;
}

/// An error that can occur while signing a JWS or JWT.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    /// The header could not be serialized.
    #[error("failed to serialize header: {0}")]
    SerializeHeader(serde_json::Error),
    /// The signer failed to produce a signature.
    #[error("failed to sign")]
    Sign(#[source] crypto::Error),
    /// The claims could not be serialized.
    #[error("failed to serialize claims: {0}")]
    SerializeClaims(serde_json::Error),
    /// The claims serialized into something other than a JSON object.
    #[error("the claims must serialize into a JSON object")]
    ClaimsNotAnObject,
}

impl From<crypto::Error> for SignError {
    fn from(err: crypto::Error) -> Self {
        Self::Sign(err)
    }
}

