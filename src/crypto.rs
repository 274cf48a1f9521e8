//! Cryptographic primitives.
//!
//! One module per algorithm family. Every module hands out values that
//! implement [`jws::Signer`](crate::jws::Signer) and/or
//! [`jws::Verifier`](crate::jws::Verifier) bound to exactly one algorithm.
//! All primitives are implemented on top of the [RustCrypto] crates.
//!
//! [RustCrypto]: https://github.com/RustCrypto

pub mod ec;
pub mod hmac;
pub mod none;
pub mod rsa;

use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

/// The result type used for cryptographic operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The errors produced by the cryptographic primitives.
///
/// Errors of the underlying crates are kept by value, because they only
/// implement [`core::error::Error`] when their `std` feature is enabled.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The key has a length the primitive cannot work with.
    #[error("invalid key length")]
    InvalidLength,
    /// A coordinate or scalar of an elliptic curve key had the wrong width.
    #[error("expected {expected} bytes of key material, got {actual}")]
    InvalidKeyMaterialLength {
        /// The width the curve requires.
        expected: usize,
        /// The width that was supplied.
        actual: usize,
    },
    /// The coordinates do not describe a point on the curve.
    #[error("the coordinates are not a valid point on the curve")]
    InvalidEcPoint,
    /// An error returned by the `rsa` crate.
    #[error("rsa: {0}")]
    Rsa(::rsa::Error),
    /// An error returned by the `elliptic-curve` crate.
    #[error("elliptic curve: {0}")]
    EllipticCurve(elliptic_curve::Error),
    /// An error returned while computing or parsing a signature.
    #[error("signature: {0}")]
    Signature(signature::Error),
    /// The operating system failed to provide randomness.
    #[error("failed to gather randomness: {0}")]
    Random(rand_core::Error),
}

impl From<::rsa::Error> for Error {
    fn from(err: ::rsa::Error) -> Self {
        Self::Rsa(err)
    }
}

impl From<elliptic_curve::Error> for Error {
    fn from(err: elliptic_curve::Error) -> Self {
        Self::EllipticCurve(err)
    }
}

impl From<signature::Error> for Error {
    fn from(err: signature::Error) -> Self {
        Self::Signature(err)
    }
}

impl From<digest::InvalidLength> for Error {
    fn from(_: digest::InvalidLength) -> Self {
        Self::InvalidLength
    }
}

/// The raw bytes returned by the signers of this crate.
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub(crate) const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Signature> for Vec<u8> {
    fn from(value: Signature) -> Self {
        value.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature")
            .field(&crate::base64_url::encode(&self.0))
            .finish()
    }
}
