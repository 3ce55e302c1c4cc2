//! JSON codec for values crossing the transport boundary

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Encode a value as a JSON string
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encode a value as a JSON tree
pub fn to_json_value<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

/// Decode a value from JSON, ignoring unknown members
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a value from raw JSON bytes as received off the wire
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
