//! RSA public keys (`kty` = `RSA`) as defined in [section 6.3 of RFC 7518].
//!
//! [section 6.3 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.3>

use alloc::string::String;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::KeyDescription;
use crate::{
    base64_url::{self, Base64UrlBytes},
    crypto::{self, rsa::PublicKey},
};

/// A JWK holding an RSA [`PublicKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaJsonWebKey {
    /// The shared parameters.
    pub description: KeyDescription,
    /// The public key.
    pub key: PublicKey,
}

#[derive(Deserialize)]
pub(super) struct Repr {
    n: Base64UrlBytes,
    e: Base64UrlBytes,
}

impl RsaJsonWebKey {
    /// Creates a key without any shared parameters.
    pub fn new(key: PublicKey) -> Self {
        Self {
            description: KeyDescription::default(),
            key,
        }
    }

    pub(super) fn from_repr(description: KeyDescription, repr: Repr) -> crypto::Result<Self> {
        let key = PublicKey::from_components(&repr.n.0, &repr.e.0)?;
        Ok(Self { description, key })
    }

    pub(super) fn write_into(&self, object: &mut Map<String, Value>) {
        object.insert(
            String::from("n"),
            Value::String(base64_url::encode(self.key.n())),
        );
        object.insert(
            String::from("e"),
            Value::String(base64_url::encode(self.key.e())),
        );
    }
}
