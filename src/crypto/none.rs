//! The unsecured `none` algorithm ([section 3.6 of RFC 7518]).
//!
//! [section 3.6 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.6>

use alloc::vec::Vec;

use super::{Result, Signature};
use crate::{jwa::JsonWebSigningAlgorithm, jws};

/// Signs with an empty signature under `alg = "none"`.
///
/// As a [`Verifier`](jws::Verifier) it accepts nothing but an empty signature
/// under the `none` label, so it must only be used where unsecured tokens
/// are explicitly wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsecured;

impl jws::Signer<Signature> for Unsecured {
    fn sign(&self, _: &[u8]) -> Result<Signature> {
        Ok(Signature::new(Vec::new()))
    }

    fn algorithm(&self) -> JsonWebSigningAlgorithm {
        JsonWebSigningAlgorithm::None
    }
}

impl jws::Verifier for Unsecured {
    fn verify(
        &self,
        alg: &JsonWebSigningAlgorithm,
        _: &[u8],
        signature: &[u8],
    ) -> Result<(), jws::VerifyError> {
        jws::ensure_algorithm(JsonWebSigningAlgorithm::None, alg)?;

        if signature.is_empty() {
            Ok(())
        } else {
            Err(jws::VerifyError::InvalidSignature)
        }
    }
}
