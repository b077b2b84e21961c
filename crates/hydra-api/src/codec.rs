//! JSON and YAML encoding for resource documents.
//!
//! Every decode failure becomes [`Error::Malformed`], whatever the cause:
//! wrong field types, missing keys, unknown enum literals, bad quantities.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

const RESOURCE: &str = "resource";

pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::malformed(RESOURCE, e))
}

pub fn from_yaml<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_yaml::from_str(text).map_err(|e| Error::malformed(RESOURCE, e))
}

pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::malformed(RESOURCE, e))
}

/// Parse YAML into an untyped JSON value, e.g. to inspect `kind` first.
pub fn yaml_to_value(text: &str) -> Result<Value> {
    serde_yaml::from_str(text).map_err(|e| Error::malformed("yaml document", e))
}

pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::malformed(RESOURCE, e))
}

pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::malformed(RESOURCE, e))
}

pub fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::malformed(RESOURCE, e))
}
