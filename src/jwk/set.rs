//! This module contains the JWK Set implementation.

use alloc::{string::String, vec::Vec};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::JsonWebKey;

/// A list of [`JsonWebKey`] objects, which is parsed according to [Section
/// 5 of RFC 7517](https://www.rfc-editor.org/rfc/rfc7517#section-5).
///
/// The order of the keys is kept, and every lookup returns the first key that
/// matches. Decoding fails as a whole if any of the keys fails to decode.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct JsonWebKeySet {
    keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Returns `true` if any key matches `predicate`.
    pub fn contains(&self, predicate: impl FnMut(&JsonWebKey) -> bool) -> bool {
        self.keys.iter().any(predicate)
    }

    /// Returns the first key matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&JsonWebKey) -> bool) -> Option<&JsonWebKey> {
        self.keys.iter().find(|&key| predicate(key))
    }

    /// Tries to find the JWK with the given key ID paramter set.
    pub fn find_by_key_id(&self, key_id: &str) -> Option<&JsonWebKey> {
        self.find(|key| key.key_id() == Some(key_id))
    }

    /// Returns an iterator over all the JWKs in this set.
    pub fn iter(&self) -> impl Iterator<Item = &JsonWebKey> {
        self.keys.iter()
    }

    /// Appends a key at the end of the set.
    pub fn push(&mut self, key: JsonWebKey) {
        self.keys.push(key);
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'de> Deserialize<'de> for JsonWebKeySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            keys: Vec<Map<String, Value>>,
        }

        let repr = Repr::deserialize(deserializer)?;

        let keys = repr
            .keys
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                JsonWebKey::from_json_object(object).map_err(|err| {
                    debug!(index, error = %err, "rejected JWK set");
                    D::Error::custom(alloc::format!("key {index}: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { keys })
    }
}

impl<'a> IntoIterator for &'a JsonWebKeySet {
    type IntoIter = core::slice::Iter<'a, JsonWebKey>;
    type Item = &'a JsonWebKey;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl IntoIterator for JsonWebKeySet {
    type IntoIter = alloc::vec::IntoIter<Self::Item>;
    type Item = JsonWebKey;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl From<Vec<JsonWebKey>> for JsonWebKeySet {
    fn from(keys: Vec<JsonWebKey>) -> Self {
        Self { keys }
    }
}

impl FromIterator<JsonWebKey> for JsonWebKeySet {
    fn from_iter<T: IntoIterator<Item = JsonWebKey>>(iter: T) -> Self {
        let keys = iter.into_iter().collect();
        Self { keys }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::jwk::{KeyDescription, KeyType, OctetSequence};

    fn oct(kid: &str, secret: &[u8]) -> JsonWebKey {
        JsonWebKey::from(OctetSequence::new(secret))
            .with_description(KeyDescription::default().with_key_id(kid))
    }

    #[test]
    fn first_match_wins() {
        let set = JsonWebKeySet::from(alloc::vec![oct("a", b"1"), oct("b", b"2"), oct("a", b"3")]);

        let JsonWebKey::Symmetric(key) = set.find_by_key_id("a").unwrap() else {
            panic!("expected a symmetric key");
        };
        assert_eq!(key.key.bytes(), b"1");

        assert!(set.contains(|key| key.key_id() == Some("b")));
        assert!(set.find_by_key_id("c").is_none());
        assert!(set.find(|key| key.key_type() == KeyType::Rsa).is_none());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn one_bad_key_fails_the_set() {
        let value = json!({
            "keys": [
                { "kty": "oct", "k": "aw" },
                { "kty": "OKP", "crv": "Ed25519", "x": "AA" },
            ]
        });
        assert!(serde_json::from_value::<JsonWebKeySet>(value).is_err());
        assert!(serde_json::from_value::<JsonWebKeySet>(json!({ "kyes": [] })).is_err());
    }

    #[test]
    fn serializes_under_keys() {
        let set: JsonWebKeySet = [oct("a", b"k")].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({ "keys": [{ "kty": "oct", "kid": "a", "k": "aw" }] })
        );
    }
}
