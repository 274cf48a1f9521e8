use alloc::vec::Vec;
use core::{fmt, str::FromStr};

use crate::{base64_url::NoBase64UrlString, Base64UrlString};

/// The compact representation is essentially a list of Base64Url
/// strings that are separated by `.`.
///
/// # Examples
///
/// ```
/// # use jose_envelope::{format::Compact, Base64UrlString};
/// # use std::str::FromStr;
/// let mut c = Compact::new();
///
/// c.push(Base64UrlString::encode(b"abc"));
/// c.push(Base64UrlString::encode(b"def"));
///
/// assert_eq!(c.to_string(), "YWJj.ZGVm");
/// assert_eq!(Compact::from_str("YWJj.ZGVm").unwrap(), c);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compact {
    parts: Vec<Base64UrlString>,
}

impl Compact {
    /// Creates an empty compact representation that can be filled
    /// with parts.
    pub fn new() -> Self {
        Self::with_capacity(3)
    }

    pub(crate) fn with_capacity(cap: usize) -> Self {
        Compact {
            parts: Vec::with_capacity(cap),
        }
    }

    /// Pushes the given part into this compact representation.
    pub fn push(&mut self, part: Base64UrlString) {
        self.parts.push(part);
    }

    /// Returns the part at `idx`, if there is one.
    pub fn part(&self, idx: usize) -> Option<&Base64UrlString> {
        self.parts.get(idx)
    }

    /// The number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if no part was pushed yet.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterates over all parts in order.
    pub fn iter(&self) -> impl Iterator<Item = &Base64UrlString> + '_ {
        self.parts.iter()
    }
}

impl FromStr for Compact {
    type Err = NoBase64UrlString;

    /// Verifies if every part of the string is valid base64url format
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(Base64UrlString::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parts })
    }
}

impl fmt::Display for Compact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.parts.iter().enumerate() {
            if idx != 0 {
                f.write_str(".")?;
            }

            fmt::Display::fmt(part, f)?;
        }

        Ok(())
    }
}
