use alloc::string::String;

use thiserror::Error;

use super::{JsonWebKey, KeyType};
use crate::{
    crypto::{ec, hmac, rsa},
    jwa::{self, JsonWebSigningAlgorithm},
    jws::{self, Verifier as _, VerifyError},
};

/// An error returned when a [`JwkVerifier`] can not be built from a key.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FromJwkError {
    /// The algorithm can not be used with this kind of key.
    #[error("`{algorithm}` can not be used with a key of type `{key_type}`")]
    IncompatibleAlgorithm {
        /// The `kty` of the key.
        key_type: KeyType,
        /// The requested algorithm.
        algorithm: JsonWebSigningAlgorithm,
    },
    /// The `alg` parameter of the key names a different algorithm.
    #[error("the key is restricted to `{hint}`, but `{requested}` was requested")]
    AlgorithmHintMismatch {
        /// The `alg` parameter of the key.
        hint: JsonWebSigningAlgorithm,
        /// The requested algorithm.
        requested: JsonWebSigningAlgorithm,
    },
    /// No algorithm was requested and the key has no `alg` parameter.
    #[error("the key has no `alg` parameter")]
    MissingAlgorithm,
    /// The curve of the key does not match the algorithm.
    #[error(transparent)]
    KeyMismatch(#[from] ec::KeyMismatchError),
}

#[derive(Debug, Clone)]
enum InnerVerifier {
    Hs256(hmac::Key<hmac::Hs256>),
    Hs384(hmac::Key<hmac::Hs384>),
    Hs512(hmac::Key<hmac::Hs512>),
    Rsa(rsa::Verifier),
    Ec(ec::Verifier),
}

/// An abstract [`Verifier`](jws::Verifier) over all possible [key
/// types](KeyType), bound to one algorithm.
#[derive(Debug, Clone)]
pub struct JwkVerifier {
    inner: InnerVerifier,
    key_id: Option<String>,
}

impl JwkVerifier {
    /// Creates a verifier for `alg` from `key`.
    ///
    /// # Errors
    ///
    /// Fails if `alg` does not fit the key type, contradicts the `alg`
    /// parameter of the key, or needs a different curve.
    pub fn new(key: &JsonWebKey, alg: JsonWebSigningAlgorithm) -> Result<Self, FromJwkError> {
        if let Some(hint) = key.algorithm() {
            if hint != &alg {
                return Err(FromJwkError::AlgorithmHintMismatch {
                    hint: hint.clone(),
                    requested: alg,
                });
            }
        }

        let inner = match (key, &alg) {
            (JsonWebKey::Symmetric(key), JsonWebSigningAlgorithm::Hmac(variant)) => match variant {
                jwa::Hmac::Hs256 => InnerVerifier::Hs256(hmac::Key::from(&key.key)),
                jwa::Hmac::Hs384 => InnerVerifier::Hs384(hmac::Key::from(&key.key)),
                jwa::Hmac::Hs512 => InnerVerifier::Hs512(hmac::Key::from(&key.key)),
            },
            (JsonWebKey::Rsa(key), JsonWebSigningAlgorithm::Rsa(variant)) => {
                InnerVerifier::Rsa(rsa::Verifier::new(key.key.clone(), *variant))
            }
            (JsonWebKey::Ec(key), JsonWebSigningAlgorithm::EcDSA(variant)) => {
                InnerVerifier::Ec(ec::Verifier::new(*variant, key.key.clone())?)
            }
            _ => {
                return Err(FromJwkError::IncompatibleAlgorithm {
                    key_type: key.key_type(),
                    algorithm: alg.clone(),
                })
            }
        };

        Ok(Self {
            inner,
            key_id: key.key_id().map(String::from),
        })
    }

    /// The `kid` of the key this verifier was built from.
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

impl TryFrom<&JsonWebKey> for JwkVerifier {
    type Error = FromJwkError;

    /// Uses the `alg` parameter of the key.
    fn try_from(key: &JsonWebKey) -> Result<Self, Self::Error> {
        let alg = key.algorithm().ok_or(FromJwkError::MissingAlgorithm)?;
        Self::new(key, alg.clone())
    }
}

impl jws::Verifier for JwkVerifier {
    fn verify(
        &self,
        alg: &JsonWebSigningAlgorithm,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError> {
        match &self.inner {
            InnerVerifier::Hs256(key) => key.verify(alg, msg, signature),
            InnerVerifier::Hs384(key) => key.verify(alg, msg, signature),
            InnerVerifier::Hs512(key) => key.verify(alg, msg, signature),
            InnerVerifier::Rsa(verifier) => verifier.verify(alg, msg, signature),
            InnerVerifier::Ec(verifier) => verifier.verify(alg, msg, signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwk::{KeyDescription, OctetSequence},
        jws::Signer as _,
    };

    fn oct(alg: Option<jwa::Hmac>) -> JsonWebKey {
        let mut description = KeyDescription::default().with_key_id("oct");
        if let Some(alg) = alg {
            description = description.with_algorithm(alg);
        }
        JsonWebKey::from(OctetSequence::new(b"k".as_slice())).with_description(description)
    }

    #[test]
    fn verifies_with_the_bound_algorithm() {
        let verifier = JwkVerifier::new(&oct(None), jwa::Hmac::Hs384.into()).unwrap();
        assert_eq!(verifier.key_id(), Some("oct"));

        let key = hmac::Key::<hmac::Hs384>::new(b"k");
        let sig = key.sign(b"msg").unwrap();
        jws::Verifier::verify(&verifier, &key.algorithm(), b"msg", sig.as_ref()).unwrap();

        assert!(matches!(
            jws::Verifier::verify(&verifier, &jwa::Hmac::Hs256.into(), b"msg", sig.as_ref()),
            Err(VerifyError::AlgorithmMismatch { .. })
        ));
    }

    #[test]
    fn uses_the_alg_hint() {
        assert!(matches!(
            JwkVerifier::try_from(&oct(None)),
            Err(FromJwkError::MissingAlgorithm)
        ));
        assert!(JwkVerifier::try_from(&oct(Some(jwa::Hmac::Hs512))).is_ok());
        assert!(matches!(
            JwkVerifier::new(&oct(Some(jwa::Hmac::Hs512)), jwa::Hmac::Hs256.into()),
            Err(FromJwkError::AlgorithmHintMismatch { .. })
        ));
    }

    #[test]
    fn rejects_other_key_types() {
        for alg in [
            JsonWebSigningAlgorithm::Rsa(jwa::RsassaPkcs1V1_5::Rs256),
            JsonWebSigningAlgorithm::EcDSA(jwa::EcDSA::Es256),
            JsonWebSigningAlgorithm::None,
            JsonWebSigningAlgorithm::Other("HS1".into()),
        ] {
            assert!(matches!(
                JwkVerifier::new(&oct(None), alg),
                Err(FromJwkError::IncompatibleAlgorithm {
                    key_type: KeyType::Oct,
                    ..
                })
            ));
        }
    }

    #[test]
    fn checks_the_curve() {
        let key = JsonWebKey::from(ec::PrivateKey::generate(ec::Curve::P256).to_public_key());

        assert!(JwkVerifier::new(&key, jwa::EcDSA::Es256.into()).is_ok());
        assert!(matches!(
            JwkVerifier::new(&key, jwa::EcDSA::Es512.into()),
            Err(FromJwkError::KeyMismatch(_))
        ));
    }
}
