use thiserror::Error;

use crate::{crypto, jwa::JsonWebSigningAlgorithm};

/// Error type returned for the `verify` operation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// The verifier is bound to a different algorithm than the one the
    /// signature claims to use.
    #[error("expected algorithm `{expected}`, got `{actual}`")]
    AlgorithmMismatch {
        /// The algorithm of the verifier.
        expected: JsonWebSigningAlgorithm,
        /// The algorithm the signature was presented with.
        actual: JsonWebSigningAlgorithm,
    },
    /// Indicating that the signature does not correspond to the message.
    #[error("invalid signature")]
    InvalidSignature,
    /// Failed to verify message because of unexpected reason.
    #[error(transparent)]
    Crypto(#[from] crypto::Error),
}

/// This trait represents anything that can be used to verify a JWS.
///
/// A verifier is bound to exactly one algorithm. Implementations must reject
/// any `alg` other than their own, even if the bytes would verify, so a token
/// can never choose which algorithm it is checked with.
pub trait Verifier: Send + Sync {
    /// The `verify` operation.
    ///
    /// If the message is valid, returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::AlgorithmMismatch`] if `alg` is not the bound
    /// algorithm, [`VerifyError::InvalidSignature`] if the signature did not
    /// match, or [`VerifyError::Crypto`] if the underlying primitive failed.
    fn verify(
        &self,
        alg: &JsonWebSigningAlgorithm,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError>;
}

/// Returned by [`JsonWebSignature::verify_signature`](super::JsonWebSignature::verify_signature).
#[derive(Debug, Error)]
#[error("invalid signature")]
pub struct InvalidSignatureError {
    /// What the verifier reported.
    #[source]
    pub cause: VerifyError,
}

pub(crate) fn ensure_algorithm(
    expected: JsonWebSigningAlgorithm,
    actual: &JsonWebSigningAlgorithm,
) -> Result<(), VerifyError> {
    if &expected == actual {
        Ok(())
    } else {
        Err(VerifyError::AlgorithmMismatch {
            expected,
            actual: actual.clone(),
        })
    }
}
