//! The [`JoseHeader`] of a compact JWS as defined in [section 4 of RFC 7515].
//!
//! [section 4 of RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515#section-4>

use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::jwa::JsonWebSigningAlgorithm;

/// The protected header of a [`JsonWebSignature`](super::JsonWebSignature).
///
/// Only the parameters this crate acts on are modelled. Unknown members of a
/// parsed header are ignored, while `alg` is mandatory.
///
/// The `alg` (and `kid`, if the signer provides one) parameter is always
/// overwritten when signing, so there is no way to set it here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoseHeader {
    #[serde(rename = "alg")]
    algorithm: JsonWebSigningAlgorithm,
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
    #[serde(rename = "cty", default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    key_id: Option<String>,
}

impl Default for JoseHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl JoseHeader {
    /// Creates an empty header.
    pub const fn new() -> Self {
        Self {
            algorithm: JsonWebSigningAlgorithm::None,
            typ: None,
            content_type: None,
            key_id: None,
        }
    }

    /// Sets the `typ` parameter, e.g. `JWT`.
    #[must_use]
    pub fn with_type(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    /// Sets the `cty` parameter.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the `kid` parameter. A signer with its own key id replaces it.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// The `alg` parameter.
    pub const fn algorithm(&self) -> &JsonWebSigningAlgorithm {
        &self.algorithm
    }

    /// The `typ` parameter.
    pub fn typ(&self) -> Option<&str> {
        self.typ.as_deref()
    }

    /// The `cty` parameter.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The `kid` parameter.
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub(crate) fn set_algorithm(&mut self, alg: JsonWebSigningAlgorithm) {
        self.algorithm = alg;
    }

    pub(crate) fn set_key_id(&mut self, key_id: Option<&str>) {
        if let Some(kid) = key_id {
            self.key_id = Some(String::from(kid));
        }
    }
}
