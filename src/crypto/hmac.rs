//! The primitives for working with [HMAC] algorithms.
//!
//! [HMAC]: https://en.wikipedia.org/wiki/HMAC

use alloc::{string::String, vec::Vec};
use core::{fmt, marker::PhantomData};

use ::hmac::{Hmac, Mac as _};
use rand_core::{OsRng, RngCore as _};
use secrecy::{ExposeSecret, SecretSlice};
use subtle::ConstantTimeEq as _;

use super::{Error, Result, Signature};
use crate::{
    jwa,
    jwk::symmetric::OctetSequence,
    jws::{self, FromKey, InvalidSigningAlgorithmError},
};

/// Marker trait is implemented for all supported HMAC variants.
pub trait Variant: crate::sealed::Sealed + Send + Sync + 'static {
    /// The JWA algorithm for this variant.
    const ALGORITHM: jwa::Hmac;
}

/// A key that can be used for signing and verifying HMAC signatures.
///
/// The same value is both the [`Signer`](jws::Signer) and the
/// [`Verifier`](jws::Verifier): verifying recomputes the MAC and compares it
/// with the given signature in constant time.
pub struct Key<H: Variant> {
    secret: SecretSlice<u8>,
    key_id: Option<String>,
    _variant: PhantomData<H>,
}

impl<H: Variant> Key<H> {
    /// Creates a key from raw secret bytes.
    ///
    /// No minimum length is enforced.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: SecretSlice::from(secret.as_ref().to_vec()),
            key_id: None,
            _variant: PhantomData,
        }
    }

    /// Generate a new random key with as many bytes as the MAC output.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system failed to provide random data.
    pub fn generate() -> Result<Self> {
        let mut secret = alloc::vec![0u8; H::ALGORITHM.output_size()];
        OsRng.try_fill_bytes(&mut secret).map_err(Error::Random)?;

        Ok(Self {
            secret: SecretSlice::from(secret),
            key_id: None,
            _variant: PhantomData,
        })
    }

    /// Sets the key id that is written into the `kid` header of signed values.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.expose_secret()
    }

    fn mac(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let secret = self.secret.expose_secret();

        let tag = match H::ALGORITHM {
            jwa::Hmac::Hs256 => {
                let mut mac = Hmac::<sha2::Sha256>::new_from_slice(secret)?;
                mac.update(msg);
                mac.finalize().into_bytes().to_vec()
            }
            jwa::Hmac::Hs384 => {
                let mut mac = Hmac::<sha2::Sha384>::new_from_slice(secret)?;
                mac.update(msg);
                mac.finalize().into_bytes().to_vec()
            }
            jwa::Hmac::Hs512 => {
                let mut mac = Hmac::<sha2::Sha512>::new_from_slice(secret)?;
                mac.update(msg);
                mac.finalize().into_bytes().to_vec()
            }
        };

        Ok(tag)
    }
}

impl<H: Variant> Clone for Key<H> {
    fn clone(&self) -> Self {
        Self {
            secret: SecretSlice::from(self.secret.expose_secret().to_vec()),
            key_id: self.key_id.clone(),
            _variant: PhantomData,
        }
    }
}

impl<H: Variant> fmt::Debug for Key<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("key", &self.secret)
            .field("key_id", &self.key_id)
            .field("algorithm", &H::ALGORITHM)
            .finish()
    }
}

impl<H: Variant> jws::Signer<Signature> for Key<H> {
    fn sign(&self, msg: &[u8]) -> Result<Signature> {
        self.mac(msg).map(Signature::new)
    }

    fn algorithm(&self) -> jwa::JsonWebSigningAlgorithm {
        jwa::JsonWebSigningAlgorithm::Hmac(H::ALGORITHM)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

impl<H: Variant> jws::Verifier for Key<H> {
    fn verify(
        &self,
        alg: &jwa::JsonWebSigningAlgorithm,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<(), jws::VerifyError> {
        jws::ensure_algorithm(jwa::JsonWebSigningAlgorithm::Hmac(H::ALGORITHM), alg)?;

        let expected = self.mac(msg)?;

        // `ct_eq` on slices of different length is false
        if bool::from(signature.ct_eq(&expected)) {
            Ok(())
        } else {
            Err(jws::VerifyError::InvalidSignature)
        }
    }
}

impl<H: Variant> From<&OctetSequence> for Key<H> {
    fn from(key: &OctetSequence) -> Self {
        Self::new(key.bytes())
    }
}

impl<H: Variant> FromKey<&OctetSequence> for Key<H> {
    type Error = InvalidSigningAlgorithmError;

    fn from_key(
        key: &OctetSequence,
        alg: jwa::JsonWebSigningAlgorithm,
    ) -> Result<Self, Self::Error> {
        match alg {
            jwa::JsonWebSigningAlgorithm::Hmac(alg) if alg == H::ALGORITHM => Ok(Self::from(key)),
            _ => Err(InvalidSigningAlgorithmError),
        }
    }
}

impl<H: Variant> FromKey<&[u8]> for Key<H> {
    type Error = InvalidSigningAlgorithmError;

    fn from_key(key: &[u8], alg: jwa::JsonWebSigningAlgorithm) -> Result<Self, Self::Error> {
        match alg {
            jwa::JsonWebSigningAlgorithm::Hmac(alg) if alg == H::ALGORITHM => Ok(Self::new(key)),
            _ => Err(InvalidSigningAlgorithmError),
        }
    }
}

macro_rules! impl_variant {
    (#[$doc:meta] $variant:ident) => {
        #[$doc]
        #[derive(Debug)]
        pub enum $variant {}

        impl Variant for $variant {
            const ALGORITHM: jwa::Hmac = jwa::Hmac::$variant;
        }
        impl crate::sealed::Sealed for $variant {}
    };
}

impl_variant!(
    /// Marker type that represents Hmac using the Sha256 digest.
    Hs256
);
impl_variant!(
    /// Marker type that represents Hmac using the Sha384 digest.
    Hs384
);
impl_variant!(
    /// Marker type that represents Hmac using the Sha512 digest.
    Hs512
);
