//! Field deserializers for hand-edited profile documents.
//!
//! A malformed optional value is logged and dropped so the resolve step can
//! substitute its default. Only structurally broken JSON fails the document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use super::athlete::DescentRating;

/// Any value that does not parse as `T` becomes `None`.
pub(crate) fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value.clone())
        .map_err(|err| debug!("Ignoring malformed value {value}: {err}"))
        .ok())
}

/// Keeps the elements that parse as `T`; a non-array yields an empty list.
pub(crate) fn lossy_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!("Expected a list, got {other}; ignoring");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value(item.clone())
                .map_err(|err| debug!("Dropping list entry {item}: {err}"))
                .ok()
        })
        .collect())
}

/// Non-negative count from an integer, a float (rounded) or a numeric string.
fn count(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() || n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n.round() as u32)
}

/// Heart rate in beats per minute.
pub(crate) fn bpm<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let bpm = count(&value);
    if bpm.is_none() && !value.is_null() {
        debug!("Ignoring heart rate {value}");
    }
    Ok(bpm)
}

/// `[min, max]` pair of counts, reordered when given backwards.
pub(crate) fn count_range<'de, D>(deserializer: D) -> Result<Option<[u32; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let range = match value.as_array().map(Vec::as_slice) {
        Some([low, high]) => count(low).zip(count(high)).map(|(a, b)| [a.min(b), a.max(b)]),
        _ => None,
    };
    if range.is_none() && !value.is_null() {
        debug!("Ignoring count range {value}");
    }
    Ok(range)
}

/// Descent rating label in any letter case.
pub(crate) fn descent_rating<'de, D>(deserializer: D) -> Result<Option<DescentRating>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let rating = value.as_str().and_then(DescentRating::from_label);
    if rating.is_none() && !value.is_null() {
        debug!("Unrecognised steep_descents rating {value}");
    }
    Ok(rating)
}

/// String-valued entries of an object; other entries are dropped.
pub(crate) fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            debug!("Expected an object, got {other}; ignoring");
            return Ok(BTreeMap::new());
        }
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            other => {
                debug!("Dropping entry {key}: {other} is not a string");
                None
            }
        })
        .collect())
}
