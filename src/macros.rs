/// Implements `Display`, `Serialize` and `Deserialize` for an algorithm enum
/// with an `Other(String)` fallback, plus `from_str_without_other` which only
/// matches the registered names.
///
/// Every entry needs the value and the identical pattern, because a macro
/// fragment cannot be used as both.
macro_rules! impl_serde_jwa {
    ($T:ty, [
        $($name:literal => $val:expr; $valp:pat,)*
    ]) => {
        impl core::fmt::Display for $T {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match &self {
                    $($valp => f.write_str($name),)*
                    Self::Other(other) => f.write_str(other),
                }
            }
        }

        #[allow(unused_qualifications)]
        impl<'de> serde::Deserialize<'de> for $T {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let name = <alloc::borrow::Cow<'_, str> as serde::Deserialize>::deserialize(deserializer)?;

                Ok(Self::from_str_without_other(&name).unwrap_or_else(|| {
                    Self::Other(alloc::string::String::from(name))
                }))
            }
        }

        #[allow(unused_qualifications)]
        impl serde::Serialize for $T {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let name = match self {
                    $($valp => $name,)*
                    Self::Other(custom) => custom.as_str(),
                };
                <&str as serde::Serialize>::serialize(&name, serializer)
            }
        }

        impl From<&str> for $T {
            fn from(name: &str) -> Self {
                Self::from_str_without_other(name)
                    .unwrap_or_else(|| Self::Other(alloc::string::String::from(name)))
            }
        }

        impl $T {
            /// Tries to parse the given name into a variant, and returns `None`
            /// if no variant matched.
            pub(crate) fn from_str_without_other(name: &str) -> Option<Self> {
                match name {
                    $($name => Some($val),)*
                    _ => None,
                }
            }
        }
    };
}
