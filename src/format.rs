//! Serialization formats of a JSON Web Signature.
//!
//! Only the [`Compact`] serialization is supported. Its flattened and general
//! JSON siblings exist to carry several signatures or an unprotected header,
//! neither of which this crate supports.

mod compact;

#[doc(inline)]
pub use self::compact::Compact;
