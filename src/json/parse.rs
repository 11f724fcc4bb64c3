//! Purpose: Provide the internal JSON decode entrypoints used for string inputs.
//! Exports: `from_str`, `parse_value`, `looks_like_object`, `looks_like_array`.
//! Role: Parser boundary that centralizes serde_json usage and error mapping.
//! Invariants: Parse failures map to `ErrorKind::Value` with the JSON location in the message.

use serde::de::DeserializeOwned;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::Value;

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

/// Parse JSON text into a decode-engine `Value`.
pub(crate) fn parse_value(input: &str) -> Result<Value, Error> {
    from_str::<serde_json::Value>(input)
        .map(Value::from_json)
        .map_err(|err| {
            Error::new(ErrorKind::Value)
                .with_message(format!("invalid JSON: {err}"))
                .with_source(err)
        })
}

pub(crate) fn looks_like_object(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.starts_with('{') && trimmed.ends_with('}')
}

pub(crate) fn looks_like_array(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']')
}
