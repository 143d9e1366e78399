//! Project configuration describing where the extension manifest and sources live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration file looked up in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "webext.config.json";

/// Discoverable project configuration describing the extension source layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Extension source directory, relative to the project directory.
  pub source_dir: String,
  /// Manifest file name, relative to the source directory.
  pub manifest_file: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      source_dir: "src".into(),
      manifest_file: "manifest.json".into(),
    }
  }
}

impl ProjectConfig {
  /// Attempt to load configuration from the provided project directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so callers can continue with the conventional layout.
  pub fn discover(project_dir: &Path) -> Self {
    let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Extension source directory for the project.
  pub fn source_dir_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.source_dir)
  }

  /// Manifest file for the project.
  pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
    self.source_dir_path(project_dir).join(&self.manifest_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_when_config_is_missing() {
    let dir = tempdir().unwrap();
    let config = ProjectConfig::discover(dir.path());

    assert_eq!(config, ProjectConfig::default());
    assert_eq!(config.manifest_path(dir.path()), dir.path().join("src/manifest.json"));
  }

  #[test]
  fn reads_partial_configuration() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{"source_dir": "extension"}"#,
    )
    .unwrap();

    let config = ProjectConfig::discover(dir.path());
    assert_eq!(config.source_dir, "extension");
    assert_eq!(config.manifest_file, "manifest.json");
    assert_eq!(config.source_dir_path(dir.path()), dir.path().join("extension"));
  }

  #[test]
  fn falls_back_on_unparsable_configuration() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ nope").unwrap();

    assert_eq!(ProjectConfig::discover(dir.path()), ProjectConfig::default());
    assert!(ProjectConfig::from_path(&dir.path().join(DEFAULT_CONFIG_FILE)).is_none());
  }
}
