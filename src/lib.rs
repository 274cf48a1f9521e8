//! JSON Object Signing and Encryption, the signing half.
//!
//! This crate implements JSON Web Signatures ([RFC 7515]) in compact
//! serialization, the signature algorithms of [RFC 7518] (HMAC,
//! RSASSA-PKCS1-v1_5 and ECDSA), JSON Web Keys and Key Sets ([RFC 7517]), and
//! a JSON Web Token ([RFC 7519]) claims verification pipeline built on top of
//! the signature envelope.
//!
//! ```
//! # use jose_envelope::{crypto::hmac, jwt::{self, JsonWebToken, StandardClaims}};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = hmac::Key::<hmac::Hs256>::new(b"secret");
//!
//! let claims = StandardClaims::new()
//!     .with_issuer("oauth-server")
//!     .with_audience(["app"]);
//! let token = JsonWebToken::sign(&key, &claims)?.to_string();
//!
//! let token = JsonWebToken::decode(&token)?;
//! token.verify(&[
//!     &jwt::Signature::new(&key),
//!     &jwt::Issuer::new("oauth-server"),
//!     &jwt::Audience::new("app"),
//! ])?;
//! # Ok(())
//! # }
//! ```
//!
//! [RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515>
//! [RFC 7517]: <https://datatracker.ietf.org/doc/html/rfc7517>
//! [RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518>
//! [RFC 7519]: <https://datatracker.ietf.org/doc/html/rfc7519>
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    explicit_outlives_requirements,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc
)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    macro_use_extern_crate,
    non_ascii_idents,
    elided_lifetimes_in_paths
)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod base64_url;
pub mod crypto;
pub mod format;
pub mod jwa;
pub mod jwk;
pub mod jws;
pub mod jwt;

#[doc(inline)]
pub use base64_url::Base64UrlString;
pub use jws::JsonWebSignature;
pub use jwt::JsonWebToken;

/// Type alias to make `JsonWebSignature` easier to access.
pub type JWS = JsonWebSignature;

/// Type alias to make `JsonWebToken` easier to access.
pub type JWT = JsonWebToken;

pub(crate) mod sealed {
    pub trait Sealed {}
}
