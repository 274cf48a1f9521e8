//! The primitives for working with [EC (elliptic curve)](https://en.wikipedia.org/wiki/Elliptic-curve_cryptography)
//! algorithms (`kty` parameter = `EC`).
//!
//! Signatures are the fixed width concatenation `r || s`, each half left
//! padded to the coordinate size of the curve, as required by
//! [section 3.4 of RFC 7518].
//!
//! [section 3.4 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.4>

use alloc::{string::String, vec::Vec};
use core::fmt;

use elliptic_curve::{
    sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint},
    CurveArithmetic, FieldBytes, SecretKey,
};
use k256::Secp256k1;
use p256::NistP256;
use p384::NistP384;
use p521::NistP521;
use rand_core::OsRng;
use sha2::Digest as _;
use signature::{
    hazmat::{PrehashSigner as _, RandomizedPrehashSigner as _},
    RandomizedSigner as _, Signer as _, Verifier as _,
};

use super::{Error, Result, Signature};
use crate::{jwa, jws, Base64UrlString};

/// The curves usable with key type `EC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256, used by `ES256`
    P256,
    /// NIST P-384, used by `ES384`
    P384,
    /// NIST P-521, used by `ES512`
    P521,
    /// secp256k1, used by `ES256K`
    Secp256k1,
}

impl Curve {
    /// The name of the curve, that is also used in the `crv` parameter of a
    /// JWK.
    pub const fn name(self) -> &'static str {
        self.algorithm().curve_name()
    }

    /// Looks up a curve by its `crv` name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(Self::P256),
            "P-384" => Some(Self::P384),
            "P-521" => Some(Self::P521),
            "secp256k1" => Some(Self::Secp256k1),
            _ => None,
        }
    }

    /// The algorithm that signs with this curve.
    pub const fn algorithm(self) -> jwa::EcDSA {
        match self {
            Self::P256 => jwa::EcDSA::Es256,
            Self::P384 => jwa::EcDSA::Es384,
            Self::P521 => jwa::EcDSA::Es512,
            Self::Secp256k1 => jwa::EcDSA::Es256K,
        }
    }

    /// The bit size of the curve.
    pub const fn bits(self) -> usize {
        self.algorithm().curve_bits()
    }

    /// The width of one coordinate in bytes.
    pub const fn coordinate_size(self) -> usize {
        self.algorithm().coordinate_size()
    }
}

impl From<jwa::EcDSA> for Curve {
    fn from(alg: jwa::EcDSA) -> Self {
        match alg {
            jwa::EcDSA::Es256 => Self::P256,
            jwa::EcDSA::Es384 => Self::P384,
            jwa::EcDSA::Es512 => Self::P521,
            jwa::EcDSA::Es256K => Self::Secp256k1,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The key handed to a [`Signer`] or [`Verifier`] is on a different curve
/// than the algorithm requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "the algorithm requires a key on {expected} ({} bits), but the key is on {actual} ({} bits)",
    expected.bits(),
    actual.bits()
)]
pub struct KeyMismatchError {
    /// The curve required by the algorithm.
    pub expected: Curve,
    /// The curve of the supplied key.
    pub actual: Curve,
}

fn check_curve(alg: jwa::EcDSA, actual: Curve) -> Result<(), KeyMismatchError> {
    let expected = Curve::from(alg);
    if expected == actual {
        Ok(())
    } else {
        Err(KeyMismatchError { expected, actual })
    }
}

fn field_bytes<C: elliptic_curve::Curve>(curve: Curve, bytes: &[u8]) -> Result<&FieldBytes<C>> {
    if bytes.len() != curve.coordinate_size() {
        return Err(Error::InvalidKeyMaterialLength {
            expected: curve.coordinate_size(),
            actual: bytes.len(),
        });
    }

    Ok(FieldBytes::<C>::from_slice(bytes))
}

fn public_from_coordinates<C>(
    curve: Curve,
    x: &[u8],
    y: &[u8],
) -> Result<elliptic_curve::PublicKey<C>>
where
    C: elliptic_curve::Curve + CurveArithmetic,
    <C as elliptic_curve::Curve>::FieldBytesSize: ModulusSize,
    <C as CurveArithmetic>::AffinePoint: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let x = field_bytes::<C>(curve, x)?;
    let y = field_bytes::<C>(curve, y)?;

    let point = EncodedPoint::<C>::from_affine_coordinates(x, y, false);
    let key: Option<_> = elliptic_curve::PublicKey::<C>::from_encoded_point(&point).into();
    key.ok_or(Error::InvalidEcPoint)
}

fn coordinates<C>(key: &elliptic_curve::PublicKey<C>) -> (Vec<u8>, Vec<u8>)
where
    C: elliptic_curve::Curve + CurveArithmetic,
    <C as elliptic_curve::Curve>::FieldBytesSize: ModulusSize,
    <C as CurveArithmetic>::AffinePoint: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let point = key.to_encoded_point(false);
    // a public key is never the identity, so both coordinates are present
    let x = point.x().map(|x| x.to_vec()).unwrap_or_default();
    let y = point.y().map(|y| y.to_vec()).unwrap_or_default();
    (x, y)
}

#[derive(Clone, PartialEq, Eq)]
enum ErasedPublicKey {
    P256(elliptic_curve::PublicKey<NistP256>),
    P384(elliptic_curve::PublicKey<NistP384>),
    P521(elliptic_curve::PublicKey<NistP521>),
    Secp256k1(elliptic_curve::PublicKey<Secp256k1>),
}

/// A public key on one of the supported [curves](Curve).
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: ErasedPublicKey,
}

impl PublicKey {
    /// Creates a public key from its big-endian affine coordinates.
    ///
    /// # Errors
    ///
    /// Fails if a coordinate does not have exactly
    /// [`coordinate_size`](Curve::coordinate_size) bytes, or if the point is
    /// not on the curve.
    pub fn from_coordinates(curve: Curve, x: &[u8], y: &[u8]) -> Result<Self> {
        let inner = match curve {
            Curve::P256 => ErasedPublicKey::P256(public_from_coordinates(curve, x, y)?),
            Curve::P384 => ErasedPublicKey::P384(public_from_coordinates(curve, x, y)?),
            Curve::P521 => ErasedPublicKey::P521(public_from_coordinates(curve, x, y)?),
            Curve::Secp256k1 => ErasedPublicKey::Secp256k1(public_from_coordinates(curve, x, y)?),
        };

        Ok(Self { inner })
    }

    /// The curve this key is defined on.
    pub const fn curve(&self) -> Curve {
        match self.inner {
            ErasedPublicKey::P256(_) => Curve::P256,
            ErasedPublicKey::P384(_) => Curve::P384,
            ErasedPublicKey::P521(_) => Curve::P521,
            ErasedPublicKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }

    /// The zero padded `x` and `y` coordinates.
    pub fn coordinates(&self) -> (Vec<u8>, Vec<u8>) {
        match &self.inner {
            ErasedPublicKey::P256(key) => coordinates(key),
            ErasedPublicKey::P384(key) => coordinates(key),
            ErasedPublicKey::P521(key) => coordinates(key),
            ErasedPublicKey::Secp256k1(key) => coordinates(key),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.coordinates();

        f.debug_struct("PublicKey")
            .field("crv", &self.curve())
            .field("x", &Base64UrlString::encode(x))
            .field("y", &Base64UrlString::encode(y))
            .finish()
    }
}

impl From<p256::PublicKey> for PublicKey {
    fn from(key: p256::PublicKey) -> Self {
        Self {
            inner: ErasedPublicKey::P256(key),
        }
    }
}

impl From<p384::PublicKey> for PublicKey {
    fn from(key: p384::PublicKey) -> Self {
        Self {
            inner: ErasedPublicKey::P384(key),
        }
    }
}

impl From<p521::PublicKey> for PublicKey {
    fn from(key: p521::PublicKey) -> Self {
        Self {
            inner: ErasedPublicKey::P521(key),
        }
    }
}

impl From<k256::PublicKey> for PublicKey {
    fn from(key: k256::PublicKey) -> Self {
        Self {
            inner: ErasedPublicKey::Secp256k1(key),
        }
    }
}

#[derive(Clone)]
enum ErasedPrivateKey {
    P256(SecretKey<NistP256>),
    P384(SecretKey<NistP384>),
    P521(SecretKey<NistP521>),
    Secp256k1(SecretKey<Secp256k1>),
}

/// A private key on one of the supported [curves](Curve).
///
/// The scalar is zeroized when the key is dropped.
#[derive(Clone)]
pub struct PrivateKey {
    inner: ErasedPrivateKey,
}

impl PrivateKey {
    /// Generate a new random key on the given curve.
    pub fn generate(curve: Curve) -> Self {
        let mut rng = OsRng;

        let inner = match curve {
            Curve::P256 => ErasedPrivateKey::P256(SecretKey::random(&mut rng)),
            Curve::P384 => ErasedPrivateKey::P384(SecretKey::random(&mut rng)),
            Curve::P521 => ErasedPrivateKey::P521(SecretKey::random(&mut rng)),
            Curve::Secp256k1 => ErasedPrivateKey::Secp256k1(SecretKey::random(&mut rng)),
        };

        Self { inner }
    }

    /// Creates a private key from the big-endian scalar `d`.
    ///
    /// # Errors
    ///
    /// Fails if `d` does not have exactly
    /// [`coordinate_size`](Curve::coordinate_size) bytes, or is not a valid
    /// scalar for the curve.
    pub fn from_bytes(curve: Curve, d: &[u8]) -> Result<Self> {
        let inner = match curve {
            Curve::P256 => ErasedPrivateKey::P256(SecretKey::from_bytes(field_bytes::<NistP256>(
                curve, d,
            )?)?),
            Curve::P384 => ErasedPrivateKey::P384(SecretKey::from_bytes(field_bytes::<NistP384>(
                curve, d,
            )?)?),
            Curve::P521 => ErasedPrivateKey::P521(SecretKey::from_bytes(field_bytes::<NistP521>(
                curve, d,
            )?)?),
            Curve::Secp256k1 => ErasedPrivateKey::Secp256k1(SecretKey::from_bytes(
                field_bytes::<Secp256k1>(curve, d)?,
            )?),
        };

        Ok(Self { inner })
    }

    /// The curve this key is defined on.
    pub const fn curve(&self) -> Curve {
        match self.inner {
            ErasedPrivateKey::P256(_) => Curve::P256,
            ErasedPrivateKey::P384(_) => Curve::P384,
            ErasedPrivateKey::P521(_) => Curve::P521,
            ErasedPrivateKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }

    /// Get the public key corresponding to this private key.
    pub fn to_public_key(&self) -> PublicKey {
        let inner = match &self.inner {
            ErasedPrivateKey::P256(key) => ErasedPublicKey::P256(key.public_key()),
            ErasedPrivateKey::P384(key) => ErasedPublicKey::P384(key.public_key()),
            ErasedPrivateKey::P521(key) => ErasedPublicKey::P521(key.public_key()),
            ErasedPrivateKey::Secp256k1(key) => ErasedPublicKey::Secp256k1(key.public_key()),
        };

        PublicKey { inner }
    }

    fn sign(&self, data: &[u8], deterministic: bool) -> Result<Vec<u8>> {
        let sig = match &self.inner {
            ErasedPrivateKey::P256(key) => {
                let key = p256::ecdsa::SigningKey::from(key);

                let sig: p256::ecdsa::Signature = if deterministic {
                    key.try_sign(data)?
                } else {
                    key.try_sign_with_rng(&mut OsRng, data)?
                };

                sig.to_bytes().to_vec()
            }
            ErasedPrivateKey::P384(key) => {
                let key = p384::ecdsa::SigningKey::from(key);

                let sig: p384::ecdsa::Signature = if deterministic {
                    key.try_sign(data)?
                } else {
                    key.try_sign_with_rng(&mut OsRng, data)?
                };

                sig.to_bytes().to_vec()
            }
            ErasedPrivateKey::P521(key) => {
                // the p521 wrapper always draws a random nonce, so sign the
                // prehash with the generic key instead
                let key = ecdsa::SigningKey::<NistP521>::from(key);
                let prehash = sha2::Sha512::digest(data);

                let sig: ecdsa::Signature<NistP521> = if deterministic {
                    key.sign_prehash(&prehash)?
                } else {
                    key.sign_prehash_with_rng(&mut OsRng, &prehash)?
                };

                sig.to_bytes().to_vec()
            }
            ErasedPrivateKey::Secp256k1(key) => {
                let key = k256::ecdsa::SigningKey::from(key);

                let sig: k256::ecdsa::Signature = if deterministic {
                    key.try_sign(data)?
                } else {
                    key.try_sign_with_rng(&mut OsRng, data)?
                };

                sig.to_bytes().to_vec()
            }
        };

        Ok(sig)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("crv", &self.curve())
            .field("d", &"[REDACTED]")
            .finish()
    }
}

impl From<p256::SecretKey> for PrivateKey {
    fn from(key: p256::SecretKey) -> Self {
        Self {
            inner: ErasedPrivateKey::P256(key),
        }
    }
}

impl From<p384::SecretKey> for PrivateKey {
    fn from(key: p384::SecretKey) -> Self {
        Self {
            inner: ErasedPrivateKey::P384(key),
        }
    }
}

impl From<p521::SecretKey> for PrivateKey {
    fn from(key: p521::SecretKey) -> Self {
        Self {
            inner: ErasedPrivateKey::P521(key),
        }
    }
}

impl From<k256::SecretKey> for PrivateKey {
    fn from(key: k256::SecretKey) -> Self {
        Self {
            inner: ErasedPrivateKey::Secp256k1(key),
        }
    }
}

/// A [`Signer`](jws::Signer) using a [`PrivateKey`] and an ECDSA algorithm.
///
/// Signatures use a random nonce, unless [`deterministic`](Self::deterministic)
/// nonces according to [RFC 6979] are requested. The default follows the
/// `deterministic-ecdsa` feature.
///
/// [RFC 6979]: <https://datatracker.ietf.org/doc/html/rfc6979>
#[derive(Debug, Clone)]
pub struct Signer {
    key: PrivateKey,
    alg: jwa::EcDSA,
    deterministic: bool,
    key_id: Option<String>,
}

impl Signer {
    /// Binds `key` to `alg`.
    ///
    /// # Errors
    ///
    /// Fails if the key is not on the curve `alg` is defined over.
    pub fn new(alg: jwa::EcDSA, key: PrivateKey) -> Result<Self, KeyMismatchError> {
        check_curve(alg, key.curve())?;

        Ok(Self {
            key,
            alg,
            deterministic: cfg!(feature = "deterministic-ecdsa"),
            key_id: None,
        })
    }

    /// Switches between deterministic and randomized nonces.
    #[must_use]
    pub const fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Sets the key id that is written into the `kid` header of signed values.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// The public half of the signing key.
    pub fn public_key(&self) -> PublicKey {
        self.key.to_public_key()
    }
}

impl jws::Signer<Signature> for Signer {
    fn sign(&self, msg: &[u8]) -> Result<Signature> {
        self.key.sign(msg, self.deterministic).map(Signature::new)
    }

    fn algorithm(&self) -> jwa::JsonWebSigningAlgorithm {
        jwa::JsonWebSigningAlgorithm::EcDSA(self.alg)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

/// A [`Verifier`](jws::Verifier) using a [`PublicKey`] and an ECDSA algorithm.
#[derive(Debug, Clone)]
pub struct Verifier {
    key: PublicKey,
    alg: jwa::EcDSA,
}

impl Verifier {
    /// Binds `key` to `alg`.
    ///
    /// # Errors
    ///
    /// Fails if the key is not on the curve `alg` is defined over.
    pub fn new(alg: jwa::EcDSA, key: PublicKey) -> Result<Self, KeyMismatchError> {
        check_curve(alg, key.curve())?;
        Ok(Self { key, alg })
    }
}

impl jws::Verifier for Verifier {
    fn verify(
        &self,
        alg: &jwa::JsonWebSigningAlgorithm,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<(), jws::VerifyError> {
        jws::ensure_algorithm(jwa::JsonWebSigningAlgorithm::EcDSA(self.alg), alg)?;

        if signature.len() != 2 * self.alg.coordinate_size() {
            return Err(jws::VerifyError::InvalidSignature);
        }

        let valid = match &self.key.inner {
            ErasedPublicKey::P256(key) => {
                let Ok(sig) = p256::ecdsa::Signature::from_slice(signature) else {
                    return Err(jws::VerifyError::InvalidSignature);
                };
                p256::ecdsa::VerifyingKey::from(key).verify(msg, &sig).is_ok()
            }
            ErasedPublicKey::P384(key) => {
                let Ok(sig) = p384::ecdsa::Signature::from_slice(signature) else {
                    return Err(jws::VerifyError::InvalidSignature);
                };
                p384::ecdsa::VerifyingKey::from(key).verify(msg, &sig).is_ok()
            }
            ErasedPublicKey::P521(key) => {
                let Ok(sig) = p521::ecdsa::Signature::from_slice(signature) else {
                    return Err(jws::VerifyError::InvalidSignature);
                };
                let key = p521::ecdsa::VerifyingKey::from_encoded_point(
                    &key.to_encoded_point(false),
                )
                .map_err(Error::from)?;
                key.verify(msg, &sig).is_ok()
            }
            ErasedPublicKey::Secp256k1(key) => {
                let Ok(sig) = k256::ecdsa::Signature::from_slice(signature) else {
                    return Err(jws::VerifyError::InvalidSignature);
                };
                k256::ecdsa::VerifyingKey::from(key).verify(msg, &sig).is_ok()
            }
        };

        if valid {
            Ok(())
        } else {
            Err(jws::VerifyError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::jws::{Signer as _, Verifier as _, VerifyError};

    const CURVES: [Curve; 4] = [Curve::P256, Curve::P384, Curve::P521, Curve::Secp256k1];

    fn pair(curve: Curve) -> (Signer, Verifier) {
        let key = PrivateKey::generate(curve);
        let public = key.to_public_key();
        let alg = curve.algorithm();
        (
            Signer::new(alg, key).unwrap(),
            Verifier::new(alg, public).unwrap(),
        )
    }

    #[test]
    fn signatures_have_fixed_width() {
        for curve in CURVES {
            let (signer, verifier) = pair(curve);
            let alg = signer.algorithm();

            for msg in [&b""[..], b"a", b"a longer message that spans some blocks"] {
                let sig = signer.sign(msg).unwrap();
                assert_eq!(sig.as_ref().len(), 2 * curve.coordinate_size(), "{curve}");
                verifier.verify(&alg, msg, sig.as_ref()).unwrap();
            }
        }

        assert_eq!(Curve::P521.coordinate_size(), 66);
    }

    #[test]
    fn rejects_other_signature_lengths() {
        for curve in CURVES {
            let (signer, verifier) = pair(curve);
            let alg = signer.algorithm();
            let sig: Vec<u8> = signer.sign(b"msg").unwrap().into();

            let mut longer = vec![0u8];
            longer.extend_from_slice(&sig);

            for bad in [&sig[1..], &sig[..sig.len() - 1], &longer[..], &[][..]] {
                assert!(matches!(
                    verifier.verify(&alg, b"msg", bad),
                    Err(VerifyError::InvalidSignature)
                ));
            }
        }
    }

    #[test]
    fn deterministic_signatures_repeat() {
        for alg in [
            jwa::EcDSA::Es256,
            jwa::EcDSA::Es384,
            jwa::EcDSA::Es512,
            jwa::EcDSA::Es256K,
        ] {
            let curve = Curve::from(alg);
            let signer = Signer::new(alg, PrivateKey::generate(curve))
                .unwrap()
                .deterministic(true);
            let verifier = Verifier::new(alg, signer.public_key()).unwrap();

            let a = signer.sign(b"msg").unwrap();
            let b = signer.sign(b"msg").unwrap();
            assert_eq!(a, b, "{alg:?}");
            verifier.verify(&alg.into(), b"msg", a.as_ref()).unwrap();

            let random = signer.clone().deterministic(false);
            let c = random.sign(b"msg").unwrap();
            assert_ne!(c, random.sign(b"msg").unwrap(), "{alg:?}");
            verifier.verify(&alg.into(), b"msg", c.as_ref()).unwrap();
        }
    }

    #[test]
    fn rejects_modified_signatures() {
        for curve in CURVES {
            let (signer, verifier) = pair(curve);
            let alg = signer.algorithm();
            let sig: Vec<u8> = signer.sign(b"msg").unwrap().into();

            // one byte in r, one in s, and both ends
            let width = curve.coordinate_size();
            for i in [0, width / 2, width, width + width / 2, sig.len() - 1] {
                let mut flipped = sig.clone();
                flipped[i] ^= 0x01;
                assert!(
                    matches!(
                        verifier.verify(&alg, b"msg", &flipped),
                        Err(VerifyError::InvalidSignature)
                    ),
                    "{curve}: byte {i}"
                );
            }
        }
    }

    #[test]
    fn rejects_keys_on_other_curves() {
        let err = Signer::new(jwa::EcDSA::Es384, PrivateKey::generate(Curve::P256)).unwrap_err();
        assert_eq!(err.expected, Curve::P384);
        assert_eq!(err.actual, Curve::P256);

        // same bit size, different curve
        let public = PrivateKey::generate(Curve::P256).to_public_key();
        assert!(Verifier::new(jwa::EcDSA::Es256K, public).is_err());
    }

    #[test]
    fn rejects_mismatching_labels() {
        let (signer, verifier) = pair(Curve::P256);
        let sig = signer.sign(b"msg").unwrap();

        assert!(matches!(
            verifier.verify(&jwa::EcDSA::Es256K.into(), b"msg", sig.as_ref()),
            Err(VerifyError::AlgorithmMismatch { .. })
        ));
    }

    #[test]
    fn coordinates_round_trip() {
        for curve in CURVES {
            let public = PrivateKey::generate(curve).to_public_key();
            let (x, y) = public.coordinates();
            assert_eq!(x.len(), curve.coordinate_size());
            assert_eq!(y.len(), curve.coordinate_size());

            let rebuilt = PublicKey::from_coordinates(curve, &x, &y).unwrap();
            assert_eq!(public, rebuilt);
        }
    }

    #[test]
    fn from_coordinates_validates() {
        let (x, y) = PrivateKey::generate(Curve::P256).to_public_key().coordinates();

        assert!(matches!(
            PublicKey::from_coordinates(Curve::P256, &x[1..], &y),
            Err(Error::InvalidKeyMaterialLength {
                expected: 32,
                actual: 31
            })
        ));

        let mut off_curve = y.clone();
        off_curve[31] ^= 1;
        assert!(matches!(
            PublicKey::from_coordinates(Curve::P256, &x, &off_curve),
            Err(Error::InvalidEcPoint)
        ));
    }
}
