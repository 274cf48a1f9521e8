//! Helpers for base64 urlsafe encoded stuff

use alloc::{borrow::ToOwned, string::String, vec::Vec};
use core::{fmt, ops::Deref, str::FromStr};

use base64ct::{Base64UrlUnpadded, Encoding};
use secrecy::{ExposeSecret, SecretSlice};
use serde::{de::Error, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Error type indicating that a string was not a valid, unpadded Base64Url
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the string is not a valid Base64Url representation")]
pub struct NoBase64UrlString;

/// Encodes the given bytes using the urlsafe alphabet, without padding.
#[inline]
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    Base64UrlUnpadded::encode_string(bytes.as_ref())
}

/// Decodes an unpadded Base64Url string.
///
/// # Errors
///
/// Fails if the input contains characters outside the urlsafe alphabet,
/// contains padding, or has a length that no encoded value can have.
#[inline]
pub fn decode(text: &str) -> Result<Vec<u8>, NoBase64UrlString> {
    Base64UrlUnpadded::decode_vec(text).map_err(|_| NoBase64UrlString)
}

/// A wrapper around a [`String`] that guarantees that the inner string is a
/// valid Base64Url string.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Default)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Base64UrlString(String);

impl<'de> Deserialize<'de> for Base64UrlString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Base64UrlString::from_str(&inner).map_err(D::Error::custom)
    }
}

impl fmt::Display for Base64UrlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Base64UrlString {
    type Err = NoBase64UrlString;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(|_| Self(s.to_owned()))
    }
}

impl Base64UrlString {
    /// Encode the given bytes using Base64Url format.
    #[inline]
    pub fn encode(x: impl AsRef<[u8]>) -> Self {
        Self(encode(x))
    }

    /// Parses `s` and returns both the validated string and the bytes it
    /// encodes, so callers that need both only decode once.
    ///
    /// # Errors
    ///
    /// Fails if `s` is not valid Base64Url.
    pub fn parse(s: &str) -> Result<(Self, Vec<u8>), NoBase64UrlString> {
        let bytes = decode(s)?;
        Ok((Self(s.to_owned()), bytes))
    }

    /// Decodes this Base64Url string into it's raw byte representation.
    ///
    /// # Errors
    ///
    /// Never fails for values built by [`encode`](Self::encode) or
    /// [`FromStr`]; the result type is kept so no invariant is assumed.
    #[inline]
    pub fn decode(&self) -> Result<Vec<u8>, NoBase64UrlString> {
        decode(&self.0)
    }
}

impl Deref for Base64UrlString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub(crate) struct Base64UrlBytes(pub(crate) Vec<u8>);

impl Serialize for Base64UrlBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        encode(&self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Base64UrlBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = <alloc::borrow::Cow<'_, str>>::deserialize(deserializer)?;

        let decoded = decode(&encoded)
            .map_err(|_| D::Error::custom("encountered invalid Base64Url string"))?;

        Ok(Self(decoded))
    }
}

#[derive(Debug)]
pub(crate) struct SecretBase64UrlBytes(pub(crate) SecretSlice<u8>);

impl Serialize for SecretBase64UrlBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let encoded = Zeroizing::new(encode(self.0.expose_secret()));

        encoded.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretBase64UrlBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Zeroizing::new(String::deserialize(deserializer)?);

        let decoded = decode(&encoded)
            .map_err(|_| D::Error::custom("encountered invalid Base64Url string"))?;

        Ok(Self(SecretSlice::from(decoded)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn encode_strips_padding() {
        assert_eq!(encode(b"k"), "aw");
        assert_eq!(encode(b"ab"), "YWI");
        assert_eq!(encode([0xfb, 0xff]), "-_8");
    }

    #[test]
    fn decode_accepts_unpadded_input() {
        assert_eq!(decode("aw"), Ok(vec![b'k']));
        assert_eq!(decode("-_8"), Ok(vec![0xfb, 0xff]));
        assert_eq!(decode(""), Ok(vec![]));
    }

    #[test]
    fn decode_rejects_garbage() {
        // standard alphabet, padding, and a length no encoding can produce
        assert_eq!(decode("+/8"), Err(NoBase64UrlString));
        assert_eq!(decode("aw=="), Err(NoBase64UrlString));
        assert_eq!(decode("abcde"), Err(NoBase64UrlString));
        assert_eq!(decode("a.b"), Err(NoBase64UrlString));
    }

    #[test]
    fn parse_returns_string_and_bytes() {
        let (s, bytes) = Base64UrlString::parse("YWI").unwrap();
        assert_eq!(&*s, "YWI");
        assert_eq!(bytes, b"ab");
        assert_eq!(s.decode().unwrap(), bytes);
    }

    #[test]
    fn base64url_string_from_str() {
        assert!(Base64UrlString::from_str("not base64!").is_err());
        let s = Base64UrlString::from_str("YWI").unwrap();
        assert_eq!(s, Base64UrlString::encode(b"ab"));
    }
}
