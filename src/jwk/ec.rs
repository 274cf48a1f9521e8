//! Elliptic curve public keys (`kty` = `EC`) as defined in [section 6.2 of RFC
//! 7518].
//!
//! [section 6.2 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2>

use alloc::string::String;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{JwkError, KeyDescription};
use crate::{
    base64_url::{self, Base64UrlBytes},
    crypto::ec::{Curve, PublicKey},
};

/// A JWK holding an elliptic curve [`PublicKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcJsonWebKey {
    /// The shared parameters.
    pub description: KeyDescription,
    /// The public key, which also determines the `crv` parameter.
    pub key: PublicKey,
}

#[derive(Deserialize)]
pub(super) struct Repr {
    crv: String,
    x: Base64UrlBytes,
    y: Base64UrlBytes,
}

impl EcJsonWebKey {
    /// Creates a key without any shared parameters.
    pub fn new(key: PublicKey) -> Self {
        Self {
            description: KeyDescription::default(),
            key,
        }
    }

    /// The curve of the key.
    pub const fn curve(&self) -> Curve {
        self.key.curve()
    }

    pub(super) fn from_repr(description: KeyDescription, repr: Repr) -> Result<Self, JwkError> {
        let curve = Curve::from_name(&repr.crv).ok_or(JwkError::UnsupportedCurve(repr.crv))?;
        let key = PublicKey::from_coordinates(curve, &repr.x.0, &repr.y.0)
            .map_err(JwkError::InvalidKey)?;

        Ok(Self { description, key })
    }

    pub(super) fn write_into(&self, object: &mut Map<String, Value>) {
        let (x, y) = self.key.coordinates();

        object.insert(
            String::from("crv"),
            Value::String(String::from(self.curve().name())),
        );
        object.insert(String::from("x"), Value::String(base64_url::encode(x)));
        object.insert(String::from("y"), Value::String(base64_url::encode(y)));
    }
}
