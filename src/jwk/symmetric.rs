//! Symmetric keys (`kty` = `oct`) as defined in [section 6.4 of RFC 7518].
//!
//! [section 6.4 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.4>

use alloc::{string::String, vec::Vec};
use core::fmt;

use secrecy::{ExposeSecret, SecretSlice};
use serde::Deserialize;
use serde_json::{Map, Value};
use subtle::ConstantTimeEq as _;
use zeroize::Zeroizing;

use super::KeyDescription;
use crate::base64_url::{self, SecretBase64UrlBytes};

/// The raw bytes of a symmetric key, the `k` parameter.
///
/// The bytes are zeroized on drop and compared in constant time.
pub struct OctetSequence(SecretSlice<u8>);

impl OctetSequence {
    /// Wraps the given secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(SecretSlice::from(bytes.into()))
    }

    /// The secret bytes.
    pub fn bytes(&self) -> &[u8] {
        self.0.expose_secret()
    }

    /// The number of bytes.
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Returns `true` for an empty key.
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

impl Clone for OctetSequence {
    fn clone(&self) -> Self {
        Self::new(self.bytes())
    }
}

impl PartialEq for OctetSequence {
    fn eq(&self, other: &Self) -> bool {
        self.bytes().ct_eq(other.bytes()).into()
    }
}

impl Eq for OctetSequence {}

impl fmt::Debug for OctetSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OctetSequence").field(&"[REDACTED]").finish()
    }
}

/// A JWK holding an [`OctetSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricJsonWebKey {
    /// The shared parameters.
    pub description: KeyDescription,
    /// The secret.
    pub key: OctetSequence,
}

#[derive(Deserialize)]
pub(super) struct Repr {
    k: SecretBase64UrlBytes,
}

impl SymmetricJsonWebKey {
    /// Creates a key without any shared parameters.
    pub fn new(key: OctetSequence) -> Self {
        Self {
            description: KeyDescription::default(),
            key,
        }
    }

    pub(super) fn from_repr(description: KeyDescription, repr: Repr) -> Self {
        Self {
            description,
            key: OctetSequence(repr.k.0),
        }
    }

    pub(super) fn write_into(&self, object: &mut Map<String, Value>) {
        let encoded = Zeroizing::new(base64_url::encode(self.key.bytes()));
        object.insert(String::from("k"), Value::String(String::from(encoded.as_str())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_the_encoded_secret() {
        let key = SymmetricJsonWebKey::new(OctetSequence::new(*b"secret"));
        let mut object = Map::new();
        key.write_into(&mut object);

        assert_eq!(object.len(), 1);
        assert_eq!(object["k"], "c2VjcmV0");
        assert_eq!(base64_url::decode("c2VjcmV0").as_deref(), Ok(&b"secret"[..]));
    }
}
