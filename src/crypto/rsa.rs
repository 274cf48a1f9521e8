//! The primitives for working with [RSA] signatures (RSASSA-PKCS1-v1_5).
//!
//! Key material arrives as already parsed [`rsa`](::rsa) keys or as big-endian
//! components; PEM and DER parsing is left to the caller.
//!
//! [RSA]: https://en.wikipedia.org/wiki/RSA_cryptosystem

use alloc::{string::String, vec::Vec};
use core::fmt;

use ::rsa::{traits::PublicKeyParts as _, BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use rand_core::OsRng;
use sha2::Digest as _;

use super::{Result, Signature};
use crate::{
    jwa::{self, RsassaPkcs1V1_5},
    jws::{self, FromKey, InvalidSigningAlgorithmError},
    Base64UrlString,
};

/// The RSA public key type.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Creates a public key from the big-endian modulus `n` and exponent `e`.
    ///
    /// # Errors
    ///
    /// Fails if the `rsa` crate rejects the components, for example because
    /// the exponent is too small or the modulus too large.
    pub fn from_components(n: &[u8], e: &[u8]) -> Result<Self> {
        let n = BigUint::from_bytes_be(n);
        let e = BigUint::from_bytes_be(e);
        let key = RsaPublicKey::new(n, e)?;

        Ok(Self { inner: key })
    }

    /// The big-endian bytes of the modulus.
    pub fn n(&self) -> Vec<u8> {
        self.inner.n().to_bytes_be()
    }

    /// The big-endian bytes of the public exponent.
    pub fn e(&self) -> Vec<u8> {
        self.inner.e().to_bytes_be()
    }

    /// The size of the modulus in bytes.
    pub fn size(&self) -> usize {
        self.inner.size()
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(inner: RsaPublicKey) -> Self {
        Self { inner }
    }
}

impl AsRef<RsaPublicKey> for PublicKey {
    fn as_ref(&self) -> &RsaPublicKey {
        &self.inner
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("n", &Base64UrlString::encode(self.n()))
            .field("e", &Base64UrlString::encode(self.e()))
            .finish()
    }
}

/// The RSA private key type.
#[derive(Clone)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Generate a new RSA key pair of the given bit size.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the key generation fails.
    pub fn generate(bits: usize) -> Result<Self> {
        Ok(Self {
            inner: RsaPrivateKey::new(&mut OsRng, bits)?,
        })
    }

    /// Creates a private key from its big-endian components.
    ///
    /// # Errors
    ///
    /// Fails if the components do not form a consistent RSA key.
    pub fn from_components(n: &[u8], e: &[u8], d: &[u8], p: &[u8], q: &[u8]) -> Result<Self> {
        let primes = alloc::vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)];
        let mut key = RsaPrivateKey::from_components(
            BigUint::from_bytes_be(n),
            BigUint::from_bytes_be(e),
            BigUint::from_bytes_be(d),
            primes,
        )?;
        key.validate()?;
        key.precompute()?;

        Ok(Self { inner: key })
    }

    /// Get the public key corresponding to this private key.
    pub fn to_public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.to_public_key(),
        }
    }
}

impl From<RsaPrivateKey> for PrivateKey {
    fn from(inner: RsaPrivateKey) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.to_public_key())
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// A [`Signer`](jws::Signer) using an [`PrivateKey`] and an RSA algorithm.
#[derive(Debug, Clone)]
pub struct Signer {
    key: PrivateKey,
    alg: RsassaPkcs1V1_5,
    key_id: Option<String>,
}

impl Signer {
    /// Binds `key` to `alg`.
    pub const fn new(key: PrivateKey, alg: RsassaPkcs1V1_5) -> Self {
        Self {
            key,
            alg,
            key_id: None,
        }
    }

    /// Sets the key id that is written into the `kid` header of signed values.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl FromKey<PrivateKey> for Signer {
    type Error = InvalidSigningAlgorithmError;

    fn from_key(value: PrivateKey, alg: jwa::JsonWebSigningAlgorithm) -> Result<Self, Self::Error> {
        match alg {
            jwa::JsonWebSigningAlgorithm::Rsa(alg) => Ok(Self::new(value, alg)),
            _ => Err(InvalidSigningAlgorithmError),
        }
    }
}

impl jws::Signer<Signature> for Signer {
    fn sign(&self, msg: &[u8]) -> Result<Signature> {
        let mut rng = OsRng;

        let sig = match self.alg {
            RsassaPkcs1V1_5::Rs256 => {
                let hashed = sha2::Sha256::digest(msg);
                let pad = Pkcs1v15Sign::new::<sha2::Sha256>();
                self.key.inner.sign_with_rng(&mut rng, pad, &hashed)
            }
            RsassaPkcs1V1_5::Rs384 => {
                let hashed = sha2::Sha384::digest(msg);
                let pad = Pkcs1v15Sign::new::<sha2::Sha384>();
                self.key.inner.sign_with_rng(&mut rng, pad, &hashed)
            }
            RsassaPkcs1V1_5::Rs512 => {
                let hashed = sha2::Sha512::digest(msg);
                let pad = Pkcs1v15Sign::new::<sha2::Sha512>();
                self.key.inner.sign_with_rng(&mut rng, pad, &hashed)
            }
        };

        Ok(Signature::new(sig?))
    }

    fn algorithm(&self) -> jwa::JsonWebSigningAlgorithm {
        jwa::JsonWebSigningAlgorithm::Rsa(self.alg)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

/// A [`Verifier`](jws::Verifier) using an [`PublicKey`] and an RSA algorithm.
#[derive(Debug, Clone)]
pub struct Verifier {
    key: PublicKey,
    alg: RsassaPkcs1V1_5,
}

impl Verifier {
    /// Binds `key` to `alg`.
    pub const fn new(key: PublicKey, alg: RsassaPkcs1V1_5) -> Self {
        Self { key, alg }
    }
}

impl FromKey<PublicKey> for Verifier {
    type Error = InvalidSigningAlgorithmError;

    fn from_key(value: PublicKey, alg: jwa::JsonWebSigningAlgorithm) -> Result<Self, Self::Error> {
        match alg {
            jwa::JsonWebSigningAlgorithm::Rsa(alg) => Ok(Self::new(value, alg)),
            _ => Err(InvalidSigningAlgorithmError),
        }
    }
}

impl FromKey<PrivateKey> for Verifier {
    type Error = InvalidSigningAlgorithmError;

    /// Create a [`Verifier`] from the private key by
    /// turning it into the public key and dropping the private parts afterwards
    fn from_key(value: PrivateKey, alg: jwa::JsonWebSigningAlgorithm) -> Result<Self, Self::Error> {
        Self::from_key(value.to_public_key(), alg)
    }
}

impl jws::Verifier for Verifier {
    fn verify(
        &self,
        alg: &jwa::JsonWebSigningAlgorithm,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<(), jws::VerifyError> {
        jws::ensure_algorithm(jwa::JsonWebSigningAlgorithm::Rsa(self.alg), alg)?;

        let res = match self.alg {
            RsassaPkcs1V1_5::Rs256 => {
                let hashed = sha2::Sha256::digest(msg);
                let pad = Pkcs1v15Sign::new::<sha2::Sha256>();
                self.key.inner.verify(pad, &hashed, signature)
            }
            RsassaPkcs1V1_5::Rs384 => {
                let hashed = sha2::Sha384::digest(msg);
                let pad = Pkcs1v15Sign::new::<sha2::Sha384>();
                self.key.inner.verify(pad, &hashed, signature)
            }
            RsassaPkcs1V1_5::Rs512 => {
                let hashed = sha2::Sha512::digest(msg);
                let pad = Pkcs1v15Sign::new::<sha2::Sha512>();
                self.key.inner.verify(pad, &hashed, signature)
            }
        };

        res.map_err(|_| jws::VerifyError::InvalidSignature)
    }
}
