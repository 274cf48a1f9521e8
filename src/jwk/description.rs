use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{key_ops::deserialize_key_ops, KeyOperation, KeyUsage};
use crate::jwa::JsonWebSigningAlgorithm;

/// The parameters every key type shares ([section 4 of RFC 7517]), all of
/// them optional.
///
/// [section 4 of RFC 7517]: <https://datatracker.ietf.org/doc/html/rfc7517#section-4>
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeyDescription {
    /// `use` parameter section 4.2
    #[serde(rename = "use", default)]
    pub key_use: Option<KeyUsage>,
    /// `key_ops` parameter section 4.3
    #[serde(rename = "key_ops", default, deserialize_with = "deserialize_key_ops")]
    pub key_operations: Option<Vec<KeyOperation>>,
    /// `alg` parameter section 4.4
    #[serde(rename = "alg", default)]
    pub algorithm: Option<JsonWebSigningAlgorithm>,
    /// `kid` parameter section 4.5
    #[serde(rename = "kid", default)]
    pub key_id: Option<String>,
}

impl KeyDescription {
    /// Sets the `use` parameter.
    #[must_use]
    pub fn with_key_use(mut self, key_use: KeyUsage) -> Self {
        self.key_use = Some(key_use);
        self
    }

    /// Sets the `key_ops` parameter.
    #[must_use]
    pub fn with_key_operations(mut self, ops: impl IntoIterator<Item = KeyOperation>) -> Self {
        self.key_operations = Some(ops.into_iter().collect());
        self
    }

    /// Sets the `alg` parameter.
    #[must_use]
    pub fn with_algorithm(mut self, alg: impl Into<JsonWebSigningAlgorithm>) -> Self {
        self.algorithm = Some(alg.into());
        self
    }

    /// Sets the `kid` parameter.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    pub(crate) fn write_into(&self, object: &mut Map<String, Value>) {
        if let Some(key_use) = &self.key_use {
            object.insert("use".to_string(), Value::String(key_use.as_str().to_string()));
        }

        if let Some(ops) = &self.key_operations {
            let ops = ops
                .iter()
                .map(|op| Value::String(op.as_str().to_string()))
                .collect();
            object.insert("key_ops".to_string(), Value::Array(ops));
        }

        if let Some(alg) = &self.algorithm {
            object.insert("alg".to_string(), Value::String(alg.to_string()));
        }

        if let Some(kid) = &self.key_id {
            object.insert("kid".to_string(), Value::String(kid.clone()));
        }
    }
}
