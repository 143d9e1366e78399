//! Permissive `deserialize_with` helpers for manifest fields.
//!
//! Extension manifests are hand-written and frequently carry values of the wrong shape. A
//! malformed field must never abort decoding of the whole document, so every helper here
//! swallows shape mismatches and reports the field as absent instead.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an optional value, treating any shape mismatch as absence.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

/// Decode an optional object-shaped block.
///
/// Derived struct decoders also accept arrays as positional fields, so anything other than a
/// JSON object is treated as absent before decoding.
pub fn block<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(decode_block(value))
}

/// Decode a sequence of object-shaped blocks, keeping only the objects that decode as `T`.
pub fn block_sequence<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(match value {
    Value::Array(items) => items.into_iter().filter_map(decode_block).collect(),
    _ => Vec::new(),
  })
}

fn decode_block<T: DeserializeOwned>(value: Value) -> Option<T> {
  if !value.is_object() {
    return None;
  }
  serde_json::from_value(value).ok()
}

/// Decode an optional path-like string, discarding blank values.
pub fn optional_path<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(non_blank(value))
}

/// Decode a sequence of path-like strings, dropping non-strings and blank entries.
pub fn path_sequence<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(match value {
    Value::Array(items) => items.into_iter().filter_map(non_blank).collect(),
    _ => Vec::new(),
  })
}

/// Decode a mapping of labels to path-like strings, keeping only string values.
pub fn path_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(string_entries(value))
}

pub(crate) fn string_entries(value: Value) -> BTreeMap<String, String> {
  match value {
    Value::Object(map) => map
      .into_iter()
      .filter_map(|(key, value)| non_blank(value).map(|path| (key, path)))
      .collect(),
    _ => BTreeMap::new(),
  }
}

pub(crate) fn non_blank(value: Value) -> Option<String> {
  match value {
    Value::String(text) if !text.trim().is_empty() => Some(text),
    _ => None,
  }
}
