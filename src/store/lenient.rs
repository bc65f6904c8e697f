//! Field decoders that tolerate hand edits and older writers.
//!
//! Used through `#[serde(deserialize_with = "...")]`. A field with the wrong
//! shape falls back to its default with a warning, so one bad value never
//! discards the rest of the document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes any `T`, using `T::default()` when the value does not fit.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed field");
        T::default()
    }))
}

/// Decodes epoch seconds written as an integer, a float, or a numeric string.
///
/// Fractions are truncated toward zero.
pub fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(whole_number(&value).unwrap_or_else(|| {
        tracing::warn!(value = %value, "Ignoring malformed timestamp");
        0
    }))
}

/// Decodes a non-negative counter; anything else reads as zero.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(whole_number(&value)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_else(|| {
            tracing::warn!(value = %value, "Ignoring malformed counter");
            0
        }))
}

/// Decodes a string-keyed map, skipping entries that do not decode.
pub fn entries<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        tracing::warn!("Ignoring malformed map");
        return Ok(BTreeMap::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping malformed entry");
                None
            }
        })
        .collect())
}

fn whole_number(value: &Value) -> Option<i64> {
    let float = match value {
        Value::Number(n) => {
            if let Some(n) = n.as_i64() {
                return Some(n);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    float.is_finite().then(|| float.trunc() as i64)
}

// ============================================================================
// Tests
// ============================================================================
