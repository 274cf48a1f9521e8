//! Implementation of JSON Web Signature (JWS) as defined in [RFC 7515]
//!
//! Only the compact serialization with a single signature and an attached
//! payload is supported.
//!
//! [RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515>

mod header;
mod sign;
mod verify;

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};

pub(crate) use self::verify::ensure_algorithm;
#[doc(inline)]
pub use self::{
    header::JoseHeader,
    sign::{FromKey, InvalidSigningAlgorithmError, SignError, Signer},
    verify::{InvalidSignatureError, VerifyError, Verifier},
};
use crate::{base64_url::NoBase64UrlString, format::Compact, Base64UrlString};

/// An error that can occur while parsing a compact JWS.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseCompactError {
    /// The input did not consist of exactly three `.` separated parts.
    #[error("expected 3 parts, got {0}")]
    InvalidPartCount(usize),
    /// The header part is not valid Base64Url.
    #[error("the header is not valid Base64Url")]
    HeaderEncoding(#[source] NoBase64UrlString),
    /// The header is not a JSON object with a string `alg` member.
    #[error("invalid header: {0}")]
    InvalidHeader(serde_json::Error),
    /// The payload part is not valid Base64Url.
    #[error("the payload is not valid Base64Url")]
    PayloadEncoding(#[source] NoBase64UrlString),
    /// The signature part is not valid Base64Url.
    #[error("the signature is not valid Base64Url")]
    SignatureEncoding(#[source] NoBase64UrlString),
}

/// Representation of a JSON Web Signature (JWS) in compact serialization.
///
/// A value is either produced by [signing](Self::sign), or by
/// [decoding](Self::decode) a compact string. A decoded value is only
/// structurally valid; its signature has to be checked with
/// [`verify_signature`](Self::verify_signature) before the payload can be
/// trusted.
///
/// Every part is kept both decoded and in the exact encoded form it was
/// produced or parsed with, so [`Display`](fmt::Display) reproduces the input
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonWebSignature {
    header: JoseHeader,
    encoded_header: Base64UrlString,
    payload: Vec<u8>,
    encoded_payload: Base64UrlString,
    signature: Vec<u8>,
    encoded_signature: Base64UrlString,
}

impl JsonWebSignature {
    /// Signs `payload` with `signer`.
    ///
    /// The `alg` parameter of `header` is set to the algorithm of the signer,
    /// and so is `kid` if the signer has a key id.
    ///
    /// # Errors
    ///
    /// Fails if the header can not be serialized, or the signer fails.
    pub fn sign<S, T>(
        signer: &T,
        payload: impl Into<Vec<u8>>,
        mut header: JoseHeader,
    ) -> Result<Self, SignError>
    where
        S: AsRef<[u8]>,
        T: Signer<S> + ?Sized,
    {
        header.set_algorithm(signer.algorithm());
        header.set_key_id(signer.key_id());

        let raw_header = serde_json::to_vec(&header).map_err(SignError::SerializeHeader)?;
        let encoded_header = Base64UrlString::encode(raw_header);

        let payload = payload.into();
        let encoded_payload = Base64UrlString::encode(&payload);

        let msg = signing_input(&encoded_header, &encoded_payload);
        let signature = signer.sign(msg.as_bytes())?.as_ref().to_vec();
        let encoded_signature = Base64UrlString::encode(&signature);

        trace!(
            alg = %header.algorithm(),
            payload_len = payload.len(),
            "signed payload"
        );

        Ok(Self {
            header,
            encoded_header,
            payload,
            encoded_payload,
            signature,
            encoded_signature,
        })
    }

    /// Parses a compact JWS.
    ///
    /// No signature check happens here.
    ///
    /// # Errors
    ///
    /// Fails if `input` does not have exactly three parts, if any part is not
    /// Base64Url, or if the header is not a JSON object with an `alg`.
    pub fn decode(input: &str) -> Result<Self, ParseCompactError> {
        let parts = input.split('.').collect::<Vec<_>>();

        let &[header, payload, signature] = parts.as_slice() else {
            debug!(parts = parts.len(), "rejected compact JWS: wrong number of parts");
            return Err(ParseCompactError::InvalidPartCount(parts.len()));
        };

        let (encoded_header, raw_header) = Base64UrlString::parse(header).map_err(|e| {
            debug!(part = "header", "rejected compact JWS: invalid Base64Url");
            ParseCompactError::HeaderEncoding(e)
        })?;

        let header = parse_header(&raw_header).map_err(|e| {
            debug!(part = "header", "rejected compact JWS: invalid header");
            ParseCompactError::InvalidHeader(e)
        })?;

        let (encoded_payload, payload) = Base64UrlString::parse(payload).map_err(|e| {
            debug!(part = "payload", "rejected compact JWS: invalid Base64Url");
            ParseCompactError::PayloadEncoding(e)
        })?;

        let (encoded_signature, signature) = Base64UrlString::parse(signature).map_err(|e| {
            debug!(part = "signature", "rejected compact JWS: invalid Base64Url");
            ParseCompactError::SignatureEncoding(e)
        })?;

        Ok(Self {
            header,
            encoded_header,
            payload,
            encoded_payload,
            signature,
            encoded_signature,
        })
    }

    /// Checks the signature with `verifier`, under the `alg` of the header.
    ///
    /// # Errors
    ///
    /// Fails with whatever the verifier reported, wrapped into an
    /// [`InvalidSignatureError`].
    pub fn verify_signature(&self, verifier: &dyn Verifier) -> Result<(), InvalidSignatureError> {
        let msg = self.signing_input();

        verifier
            .verify(self.header.algorithm(), msg.as_bytes(), &self.signature)
            .map_err(|cause| InvalidSignatureError { cause })
    }

    /// The header of this JWS.
    pub const fn header(&self) -> &JoseHeader {
        &self.header
    }

    /// The raw payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The raw signature.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The ASCII string the signature is computed over,
    /// `BASE64URL(header) || '.' || BASE64URL(payload)`.
    pub fn signing_input(&self) -> String {
        signing_input(&self.encoded_header, &self.encoded_payload)
    }

    /// The three encoded parts as a [`Compact`] value.
    pub fn compact(&self) -> Compact {
        let mut compact = Compact::with_capacity(3);
        compact.push(self.encoded_header.clone());
        compact.push(self.encoded_payload.clone());
        compact.push(self.encoded_signature.clone());
        compact
    }
}

fn signing_input(header: &Base64UrlString, payload: &Base64UrlString) -> String {
    let mut msg = String::with_capacity(header.len() + payload.len() + 1);
    msg.push_str(header);
    msg.push('.');
    msg.push_str(payload);
    msg
}

fn parse_header(raw: &[u8]) -> Result<JoseHeader, serde_json::Error> {
    // derived struct visitors also accept a JSON array, so the header is
    // parsed into an object first
    let object: Map<String, Value> = serde_json::from_slice(raw)?;
    serde_json::from_value(Value::Object(object))
}

impl fmt::Display for JsonWebSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.encoded_header, self.encoded_payload, self.encoded_signature
        )
    }
}

impl FromStr for JsonWebSignature {
    type Err = ParseCompactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<JsonWebSignature> for Compact {
    fn from(jws: JsonWebSignature) -> Self {
        jws.compact()
    }
}
