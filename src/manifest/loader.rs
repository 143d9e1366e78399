//! Loading extension manifests from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::schema::Manifest;

impl Manifest {
  /// Parse a manifest from JSON text.
  ///
  /// Only invalid JSON or a document that is not an object is rejected; individual fields with
  /// unexpected shapes are read as absent.
  pub fn from_json_str(content: &str) -> Result<Self> {
    let value: serde_json::Value =
      serde_json::from_str(content).context("failed to parse extension manifest JSON")?;
    if !value.is_object() {
      bail!("extension manifest must be a JSON object");
    }
    let manifest = serde_json::from_value(value).context("failed to decode extension manifest")?;
    Ok(manifest)
  }
}

/// Load an extension manifest from disk.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("manifest not found at {}", path.display()))?;
  Manifest::from_json_str(&content)
    .with_context(|| format!("invalid manifest at {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn loads_manifest_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    fs::write(
      &path,
      r#"{"manifest_version": 3, "background": {"service_worker": "bg.js"}}"#,
    )
    .unwrap();

    let manifest = load_manifest(&path).unwrap();
    assert_eq!(manifest.service_worker(), Some("bg.js"));
  }

  #[test]
  fn reports_missing_file_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = load_manifest(&path).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
  }

  #[test]
  fn rejects_invalid_json() {
    assert!(Manifest::from_json_str("{ not json").is_err());
  }

  #[test]
  fn rejects_non_object_documents() {
    assert!(Manifest::from_json_str("[1, 2, 3]").is_err());
    assert!(Manifest::from_json_str("\"manifest\"").is_err());
  }
}
