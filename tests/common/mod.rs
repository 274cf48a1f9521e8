//! Common test helpers.
#![allow(dead_code)]

use jose_envelope::{base64_url, jwk::JsonWebKeySet};
use serde_json::Value;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn read(path: &str) -> TestResult<String> {
    let path = format!("{}/tests/{path}", env!("CARGO_MANIFEST_DIR"));
    Ok(std::fs::read_to_string(path)?)
}

/// Reads a key file from the `tests/keys` directory.
pub fn read_key(name: &str) -> TestResult<Value> {
    Ok(serde_json::from_str(&read(&format!("keys/{name}.json"))?)?)
}

/// Reads a compact token from the `tests/vectors` directory.
pub fn read_vector(name: &str) -> TestResult<String> {
    Ok(read(&format!("vectors/{name}.jwt"))?.trim().to_owned())
}

pub fn read_jwks() -> TestResult<JsonWebKeySet> {
    Ok(serde_json::from_str(&read("vectors/jwks.json")?)?)
}

/// Decodes the Base64Url member `name` of a key file.
pub fn component(key: &Value, name: &str) -> TestResult<Vec<u8>> {
    let encoded = key[name]
        .as_str()
        .ok_or_else(|| format!("missing `{name}`"))?;
    Ok(base64_url::decode(encoded)?)
}
