//! Argument decoding shared by the Sim tools.
//!
//! The model sends JSON numbers however it likes (`10`, `10.0`, `9.7`), so
//! counts and ids go through [`lenient_u64`] instead of a strict integer
//! deserializer.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use simchat_core::error::ToolError;

/// Decode a tool's arguments into its typed argument struct.
pub fn parse<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    // Models sometimes send `null` for a tool without parameters.
    let arguments = if arguments.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Accept an integer or a float; floats are floored, negatives become 0
/// and values saturate at `u64::MAX`. `null` or absent decodes to `None`.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_u64() {
        return Ok(Some(n));
    }
    if number.as_i64().is_some() {
        return Ok(Some(0));
    }
    match number.as_f64() {
        Some(f) if f.is_finite() => Ok(Some(f.floor().max(0.0) as u64)),
        _ => Err(D::Error::custom(format!("invalid number: {number}"))),
    }
}

/// The upstream page size for a requested `limit`.
pub fn clamp_limit(requested: u64, max: u64) -> u64 {
    requested.min(max)
}
