//! Normalization of caller-supplied configuration into the payload sent on
//! the wire.
//!
//! # Design
//! Input arrives in one of three shapes, modelled as `ConfigInput`:
//! - `Mapping`: an already-structured JSON object, passed through as-is.
//! - `Text`: a string that is parsed as JSON when possible, otherwise kept
//!   as an opaque body.
//! - `Encoded`: bytes that must already be valid JSON. A parse failure here
//!   is a `Decode` error rather than a pass-through.
//!
//! The result is a `Payload`, either a structured value or a raw string.
//! Converting a `Payload` back into a `ConfigInput` and normalizing again
//! yields the same `Payload`.

use serde_json::{Map, Value};

use crate::error::{AdminError, AdminResult};

/// Configuration supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigInput {
    Mapping(Map<String, Value>),
    Text(String),
    Encoded(Vec<u8>),
}

/// Canonical payload ready for transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Structured(Value),
    Raw(String),
}

impl Payload {
    /// Bytes placed in the request body.
    ///
    /// Structured values are serialized as compact JSON; raw strings are
    /// sent unchanged.
    pub fn to_body(&self) -> AdminResult<Vec<u8>> {
        match self {
            Payload::Structured(value) => serde_json::to_vec(value).map_err(AdminError::Serialization),
            Payload::Raw(text) => Ok(text.clone().into_bytes()),
        }
    }
}

/// Normalize `input` into its canonical payload.
pub fn normalize(input: ConfigInput) -> AdminResult<Payload> {
    match input {
        ConfigInput::Mapping(map) => Ok(Payload::Structured(Value::Object(map))),
        ConfigInput::Text(text) => match serde_json::from_str(&text) {
            Ok(value) => Ok(Payload::Structured(value)),
            Err(_) => Ok(Payload::Raw(text)),
        },
        ConfigInput::Encoded(bytes) => serde_json::from_slice(&bytes)
            .map(Payload::Structured)
            .map_err(AdminError::Decode),
    }
}

impl From<Map<String, Value>> for ConfigInput {
    fn from(map: Map<String, Value>) -> Self {
        ConfigInput::Mapping(map)
    }
}

/// Objects become `Mapping`; any other JSON value is carried as its JSON
/// text, which parses back to the same value.
impl From<Value> for ConfigInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ConfigInput::Mapping(map),
            other => ConfigInput::Text(other.to_string()),
        }
    }
}

impl From<String> for ConfigInput {
    fn from(text: String) -> Self {
        ConfigInput::Text(text)
    }
}

impl From<&str> for ConfigInput {
    fn from(text: &str) -> Self {
        ConfigInput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ConfigInput {
    fn from(bytes: Vec<u8>) -> Self {
        ConfigInput::Encoded(bytes)
    }
}

impl From<&[u8]> for ConfigInput {
    fn from(bytes: &[u8]) -> Self {
        ConfigInput::Encoded(bytes.to_vec())
    }
}

impl From<Payload> for ConfigInput {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Structured(value) => value.into(),
            Payload::Raw(text) => ConfigInput::Text(text),
        }
    }
}
