//! Implementation of JSON Web Algorithms (JWA) as defined in [RFC 7518]
//!
//! Only the signature algorithms of [section 3] are covered.
//!
//! [RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518>
//! [section 3]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3>

mod ecdsa;
mod hmac;
mod rsa;

use alloc::string::String;

#[doc(inline)]
pub use self::{ecdsa::EcDSA, hmac::Hmac, rsa::RsassaPkcs1V1_5};

/// A JSON Web Algorithm (JWA) for singing operations (JWS) as defined in [RFC
/// 7518 section 3]
///
/// This enum covers the `alg` Header Parameter Values for JWS. It represents
/// the table from [section 3.1], minus the RSASSA-PSS family.
///
/// [RFC 7518 section 3]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3>
/// [section 3.1]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.1>
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum JsonWebSigningAlgorithm {
    /// HMAC with SHA-2 Functions
    Hmac(Hmac),
    /// RSASSA-PKCS1-v1_5 using SHA-2 Functions
    Rsa(RsassaPkcs1V1_5),
    /// Digital Signature with ECDSA
    EcDSA(EcDSA),
    /// The "none" algorithm as defined in [section 3.6 of RFC 7518].
    ///
    /// Using this algorithm essentially means that there is
    /// no integrity protection for the JWS.
    ///
    /// [section 3.6 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.6>
    None,
    /// JSON Web Algorithms that are not recognised by this implementation.
    ///
    /// If you want to implement custom algorithms via a custom
    /// [`Signer`](crate::jws::Signer) and [`Verifier`](crate::jws::Verifier)
    /// type, you should use this type to define an identifier for your
    /// algorithm.
    Other(String),
}

impl JsonWebSigningAlgorithm {
    /// Returns `true` if this algorithm is one of the registered names this
    /// crate knows about.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<Hmac> for JsonWebSigningAlgorithm {
    fn from(alg: Hmac) -> Self {
        Self::Hmac(alg)
    }
}

impl From<RsassaPkcs1V1_5> for JsonWebSigningAlgorithm {
    fn from(alg: RsassaPkcs1V1_5) -> Self {
        Self::Rsa(alg)
    }
}

impl From<EcDSA> for JsonWebSigningAlgorithm {
    fn from(alg: EcDSA) -> Self {
        Self::EcDSA(alg)
    }
}

impl_serde_jwa!(
    JsonWebSigningAlgorithm,
    [
        "HS256" => Self::Hmac(Hmac::Hs256); Self::Hmac(Hmac::Hs256),
        "HS384" => Self::Hmac(Hmac::Hs384); Self::Hmac(Hmac::Hs384),
        "HS512" => Self::Hmac(Hmac::Hs512); Self::Hmac(Hmac::Hs512),

        "RS256" => Self::Rsa(RsassaPkcs1V1_5::Rs256); Self::Rsa(RsassaPkcs1V1_5::Rs256),
        "RS384" => Self::Rsa(RsassaPkcs1V1_5::Rs384); Self::Rsa(RsassaPkcs1V1_5::Rs384),
        "RS512" => Self::Rsa(RsassaPkcs1V1_5::Rs512); Self::Rsa(RsassaPkcs1V1_5::Rs512),

        "ES256" => Self::EcDSA(EcDSA::Es256); Self::EcDSA(EcDSA::Es256),
        "ES384" => Self::EcDSA(EcDSA::Es384); Self::EcDSA(EcDSA::Es384),
        "ES512" => Self::EcDSA(EcDSA::Es512); Self::EcDSA(EcDSA::Es512),
        "ES256K" => Self::EcDSA(EcDSA::Es256K); Self::EcDSA(EcDSA::Es256K),

        "none" => Self::None; Self::None,
    ]
);

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn registered_names_round_trip() {
        let names = [
            "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "ES256", "ES384", "ES512",
            "ES256K", "none",
        ];

        for name in names {
            let alg: JsonWebSigningAlgorithm =
                serde_json::from_value(serde_json::Value::String(name.to_string())).unwrap();
            assert!(alg.is_known(), "{name} not recognised");
            assert_eq!(alg.to_string(), name);
            assert_eq!(
                serde_json::to_value(&alg).unwrap(),
                serde_json::Value::String(name.to_string())
            );
        }
    }

    #[test]
    fn unknown_names_are_kept() {
        let alg = JsonWebSigningAlgorithm::from("PS256");
        assert_eq!(alg, JsonWebSigningAlgorithm::Other("PS256".to_string()));
        assert_eq!(alg.to_string(), "PS256");

        // names are case sensitive
        assert!(!JsonWebSigningAlgorithm::from("hs256").is_known());
    }

    #[test]
    fn family_parameters() {
        assert_eq!(Hmac::Hs384.output_size(), 48);
        assert_eq!(EcDSA::Es512.coordinate_size(), 66);
        assert_eq!(EcDSA::Es512.curve_bits(), 521);
        assert_eq!(EcDSA::Es256K.curve_name(), "secp256k1");
    }
}
