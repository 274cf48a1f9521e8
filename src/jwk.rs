//! Implementation of JSON Web Keys (JWK) as defined in [RFC 7517]
//!
//! A [`JsonWebKey`] is one of three key types, picked by the `kty` parameter:
//! a symmetric secret (`oct`), an RSA public key (`RSA`) or an elliptic curve
//! public key (`EC`). Objects with any other `kty` are rejected.
//!
//! [RFC 7517]: <https://datatracker.ietf.org/doc/html/rfc7517>

mod description;
mod ec;
mod key_ops;
mod key_use;
mod rsa;
mod set;
pub mod symmetric;
mod verifier;

use alloc::string::{String, ToString};
use core::fmt;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

#[doc(inline)]
pub use self::{
    description::KeyDescription,
    ec::EcJsonWebKey,
    key_ops::KeyOperation,
    key_use::KeyUsage,
    rsa::RsaJsonWebKey,
    set::JsonWebKeySet,
    symmetric::{OctetSequence, SymmetricJsonWebKey},
    verifier::{FromJwkError, JwkVerifier},
};
use crate::{crypto, jwa::JsonWebSigningAlgorithm};

/// The `kty` parameter ([section 6.1 of RFC 7518]).
///
/// [section 6.1 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.1>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// `oct`
    Oct,
    /// `RSA`
    Rsa,
    /// `EC`
    Ec,
}

impl KeyType {
    /// The value as it appears in the `kty` parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oct => "oct",
            Self::Rsa => "RSA",
            Self::Ec => "EC",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that can occur while decoding a [`JsonWebKey`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JwkError {
    /// The object has no `kty` member.
    #[error("missing `kty` parameter")]
    MissingKeyType,
    /// The `kty` member is not one of `oct`, `RSA` or `EC`.
    #[error("unsupported key type `{0}`")]
    UnsupportedKeyType(String),
    /// A parameter is missing or has the wrong shape.
    #[error("invalid key parameters: {0}")]
    InvalidParameters(serde_json::Error),
    /// The `crv` of an `EC` key is not supported.
    #[error("unsupported curve `{0}`")]
    UnsupportedCurve(String),
    /// The parameters do not form a valid key.
    #[error("invalid key material")]
    InvalidKey(#[source] crypto::Error),
}

/// A JSON Web Key.
///
/// Every variant holds the [shared parameters](KeyDescription) in a
/// `description` field, next to the key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonWebKey {
    /// `kty` = `oct`
    Symmetric(SymmetricJsonWebKey),
    /// `kty` = `RSA`
    Rsa(RsaJsonWebKey),
    /// `kty` = `EC`
    Ec(EcJsonWebKey),
}

impl JsonWebKey {
    /// The `kty` of this key.
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Symmetric(_) => KeyType::Oct,
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ec(_) => KeyType::Ec,
        }
    }

    /// The shared parameters of this key.
    pub const fn description(&self) -> &KeyDescription {
        match self {
            Self::Symmetric(key) => &key.description,
            Self::Rsa(key) => &key.description,
            Self::Ec(key) => &key.description,
        }
    }

    /// Mutable access to the shared parameters of this key.
    pub fn description_mut(&mut self) -> &mut KeyDescription {
        match self {
            Self::Symmetric(key) => &mut key.description,
            Self::Rsa(key) => &mut key.description,
            Self::Ec(key) => &mut key.description,
        }
    }

    /// Replaces the shared parameters of this key.
    #[must_use]
    pub fn with_description(mut self, description: KeyDescription) -> Self {
        *self.description_mut() = description;
        self
    }

    /// The `kid` parameter.
    pub fn key_id(&self) -> Option<&str> {
        self.description().key_id.as_deref()
    }

    /// The `use` parameter.
    pub fn key_use(&self) -> Option<&KeyUsage> {
        self.description().key_use.as_ref()
    }

    /// The `key_ops` parameter.
    pub fn key_operations(&self) -> Option<&[KeyOperation]> {
        self.description().key_operations.as_deref()
    }

    /// The `alg` parameter.
    pub fn algorithm(&self) -> Option<&JsonWebSigningAlgorithm> {
        self.description().algorithm.as_ref()
    }

    /// Encodes this key into a JSON object.
    pub fn to_json_object(&self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert(
            String::from("kty"),
            Value::String(String::from(self.key_type().as_str())),
        );

        match self {
            Self::Symmetric(key) => key.write_into(&mut object),
            Self::Rsa(key) => key.write_into(&mut object),
            Self::Ec(key) => key.write_into(&mut object),
        }

        self.description().write_into(&mut object);
        object
    }

    /// Decodes a key from a JSON object, dispatching on its `kty` member.
    ///
    /// Members that are not part of the key type are ignored.
    ///
    /// # Errors
    ///
    /// Fails if `kty` is missing or unsupported, if a parameter is missing or
    /// malformed, or if the parameters do not form a valid key.
    pub fn from_json_object(object: Map<String, Value>) -> Result<Self, JwkError> {
        let key_type = match object.get("kty") {
            None => return Err(JwkError::MissingKeyType),
            Some(Value::String(kty)) => match kty.as_str() {
                "oct" => KeyType::Oct,
                "RSA" => KeyType::Rsa,
                "EC" => KeyType::Ec,
                _ => return Err(JwkError::UnsupportedKeyType(kty.clone())),
            },
            Some(other) => return Err(JwkError::UnsupportedKeyType(other.to_string())),
        };

        let object = Value::Object(object);
        let description =
            KeyDescription::deserialize(&object).map_err(JwkError::InvalidParameters)?;

        let key = match key_type {
            KeyType::Oct => {
                let repr = symmetric::Repr::deserialize(&object)
                    .map_err(JwkError::InvalidParameters)?;
                Self::Symmetric(SymmetricJsonWebKey::from_repr(description, repr))
            }
            KeyType::Rsa => {
                let repr = rsa::Repr::deserialize(&object).map_err(JwkError::InvalidParameters)?;
                let key =
                    RsaJsonWebKey::from_repr(description, repr).map_err(JwkError::InvalidKey)?;
                Self::Rsa(key)
            }
            KeyType::Ec => {
                let repr = ec::Repr::deserialize(&object).map_err(JwkError::InvalidParameters)?;
                Self::Ec(EcJsonWebKey::from_repr(description, repr)?)
            }
        };

        Ok(key)
    }
}

impl From<SymmetricJsonWebKey> for JsonWebKey {
    fn from(key: SymmetricJsonWebKey) -> Self {
        Self::Symmetric(key)
    }
}

impl From<RsaJsonWebKey> for JsonWebKey {
    fn from(key: RsaJsonWebKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<EcJsonWebKey> for JsonWebKey {
    fn from(key: EcJsonWebKey) -> Self {
        Self::Ec(key)
    }
}

impl From<OctetSequence> for JsonWebKey {
    fn from(key: OctetSequence) -> Self {
        Self::Symmetric(SymmetricJsonWebKey::new(key))
    }
}

impl From<crypto::rsa::PublicKey> for JsonWebKey {
    fn from(key: crypto::rsa::PublicKey) -> Self {
        Self::Rsa(RsaJsonWebKey::new(key))
    }
}

impl From<crypto::ec::PublicKey> for JsonWebKey {
    fn from(key: crypto::ec::PublicKey) -> Self {
        Self::Ec(EcJsonWebKey::new(key))
    }
}

impl Serialize for JsonWebKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_object().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonWebKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_json_object(object).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::{
        crypto::ec::{Curve, PrivateKey},
        jwa::{EcDSA, Hmac},
    };

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(object) => object,
            _ => unreachable!(),
        }
    }

    #[test]
    fn dispatches_on_kty() {
        let key = JsonWebKey::from_json_object(object(json!({
            "kty": "oct",
            "k": "aw",
            "kid": "hmac",
            "alg": "HS256",
            "use": "sig",
            "key_ops": ["sign", "verify"],
        })))
        .unwrap();

        let JsonWebKey::Symmetric(ref oct) = key else {
            panic!("expected a symmetric key, got {key:?}");
        };
        assert_eq!(oct.key.bytes(), b"k");
        assert_eq!(key.key_type(), KeyType::Oct);
        assert_eq!(key.key_id(), Some("hmac"));
        assert_eq!(key.algorithm(), Some(&Hmac::Hs256.into()));
        assert_eq!(key.key_use(), Some(&KeyUsage::Signing));
        assert_eq!(
            key.key_operations(),
            Some(&[KeyOperation::Sign, KeyOperation::Verify][..])
        );
    }

    #[test]
    fn rejects_unknown_or_missing_kty() {
        assert!(matches!(
            JsonWebKey::from_json_object(object(json!({ "k": "aw" }))),
            Err(JwkError::MissingKeyType)
        ));
        assert!(matches!(
            JsonWebKey::from_json_object(object(json!({ "kty": "OKP", "crv": "Ed25519" }))),
            Err(JwkError::UnsupportedKeyType(kty)) if kty == "OKP"
        ));
        assert!(matches!(
            JsonWebKey::from_json_object(object(json!({ "kty": 1 }))),
            Err(JwkError::UnsupportedKeyType(_))
        ));
        // the discriminant is case sensitive
        assert!(JsonWebKey::from_json_object(object(json!({ "kty": "ec" }))).is_err());
    }

    #[test]
    fn rejects_bad_parameters() {
        for value in [
            json!({ "kty": "oct" }),
            json!({ "kty": "oct", "k": "a+w" }),
            json!({ "kty": "RSA", "n": "AQAB" }),
            json!({ "kty": "oct", "k": "aw", "key_ops": ["sign", "sign"] }),
            json!({ "kty": "oct", "k": "aw", "kid": 7 }),
        ] {
            assert!(
                matches!(
                    JsonWebKey::from_json_object(object(value.clone())),
                    Err(JwkError::InvalidParameters(_))
                ),
                "{value}"
            );
        }

        assert!(matches!(
            JsonWebKey::from_json_object(object(json!({
                "kty": "EC", "crv": "P-192", "x": "AA", "y": "AA"
            }))),
            Err(JwkError::UnsupportedCurve(crv)) if crv == "P-192"
        ));
        assert!(matches!(
            JsonWebKey::from_json_object(object(json!({
                "kty": "EC", "crv": "P-256", "x": "AA", "y": "AA"
            }))),
            Err(JwkError::InvalidKey(_))
        ));
    }

    #[test]
    fn duplicate_key_ops_are_rejected() {
        let result = JsonWebKey::from_json_object(object(json!({
            "kty": "oct",
            "k": "aw",
            "key_ops": ["sign", "verify", "sign"],
        })));
        let Err(JwkError::InvalidParameters(ref err)) = result else {
            panic!("expected invalid parameters, got {result:?}");
        };
        assert!(alloc::format!("{err}").contains("duplicate"), "{err}");

        // unknown operations are compared by value too
        assert!(JsonWebKey::from_json_object(object(json!({
            "kty": "oct",
            "k": "aw",
            "key_ops": ["rotate", "rotate"],
        })))
        .is_err());

        let key = JsonWebKey::from_json_object(object(json!({
            "kty": "oct",
            "k": "aw",
            "key_ops": ["verify", "sign"],
        })))
        .unwrap();
        assert_eq!(
            key.key_operations(),
            Some(&[KeyOperation::Verify, KeyOperation::Sign][..])
        );
    }

    #[test]
    fn ec_keys_round_trip() {
        let public = PrivateKey::generate(Curve::P384).to_public_key();
        let key = JsonWebKey::from(public).with_description(
            KeyDescription::default()
                .with_key_id("ec")
                .with_algorithm(EcDSA::Es384)
                .with_key_operations(vec![KeyOperation::Verify]),
        );

        let object = key.to_json_object();
        assert_eq!(object["kty"], "EC");
        assert_eq!(object["crv"], "P-384");
        assert_eq!(object["alg"], "ES384");
        assert_eq!(object["key_ops"], json!(["verify"]));
        assert!(!object.contains_key("use"));

        assert_eq!(JsonWebKey::from_json_object(object).unwrap(), key);
    }

    #[test]
    fn serde_uses_the_json_object() {
        let key = JsonWebKey::from(OctetSequence::new(b"k".to_vec()));
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value, json!({ "kty": "oct", "k": "aw" }));

        let decoded: JsonWebKey = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, key);

        assert!(serde_json::from_value::<JsonWebKey>(json!(["oct"])).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let key = JsonWebKey::from(OctetSequence::new(b"super secret".to_vec()));
        assert!(!alloc::format!("{key:?}").contains("super secret"));
    }
}
