//! Build integration tying manifest loading, entry extraction and classification together.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::classify::{ClassifiedFiles, FileClassifier, GlobExpander, ResourceExpander};
use crate::config::ProjectConfig;
use crate::entries::{EntryExtractor, EntryMap};
use crate::manifest::{Manifest, load_manifest};
use crate::paths::SourceDir;

/// Locations needed to derive bundler inputs for one extension.
#[derive(Debug, Clone)]
pub struct BuildContext {
  /// Manifest file to read.
  pub manifest_path: PathBuf,
  /// Directory manifest paths are resolved against.
  pub source_dir: SourceDir,
}

impl BuildContext {
  /// Create a context from explicit paths.
  pub fn new(manifest_path: impl Into<PathBuf>, source_dir: SourceDir) -> Self {
    Self {
      manifest_path: manifest_path.into(),
      source_dir,
    }
  }

  /// Create a context from a project directory and its configuration.
  pub fn from_project(project_dir: &Path, config: &ProjectConfig) -> io::Result<Self> {
    let source_dir = SourceDir::new(config.source_dir_path(project_dir))?;
    Ok(Self::new(config.manifest_path(project_dir), source_dir))
  }
}

/// Bundler inputs derived from a manifest.
#[derive(Debug, Clone)]
pub struct ManifestArtifacts {
  /// Entry points keyed by manifest role.
  pub entries: EntryMap,
  /// Referenced files bucketed by asset type.
  pub files: ClassifiedFiles,
  /// Entry points serialised as prettified JSON.
  pub entries_json: String,
  /// Asset buckets serialised as prettified JSON.
  pub files_json: String,
  /// File system paths that should trigger rerunning the derivation when changed.
  pub rerun_paths: Vec<PathBuf>,
}

impl ManifestArtifacts {
  /// `cargo:rerun-if-changed` lines for build scripts.
  pub fn rerun_directives(&self) -> Vec<String> {
    self
      .rerun_paths
      .iter()
      .map(|path| format!("cargo:rerun-if-changed={}", path.display()))
      .collect()
  }
}

/// High-level helper deriving entry points and asset buckets for an extension.
pub struct ManifestAssetsBuilder {
  context: BuildContext,
}

impl ManifestAssetsBuilder {
  /// Create a builder for the provided build context.
  pub fn new(context: BuildContext) -> Self {
    Self { context }
  }

  /// Derive artifacts, expanding resource patterns against the filesystem.
  pub fn build(&self) -> Result<ManifestArtifacts> {
    self.build_with(GlobExpander)
  }

  /// Derive entry points only, without scanning the source directory.
  pub fn entries(&self) -> Result<EntryMap> {
    let manifest = self.load()?;
    Ok(EntryExtractor::new(&manifest, &self.context.source_dir).entries())
  }

  /// Derive artifacts using a custom resource pattern expander.
  pub fn build_with<E: ResourceExpander>(&self, expander: E) -> Result<ManifestArtifacts> {
    let BuildContext {
      manifest_path,
      source_dir,
    } = &self.context;

    let manifest = self.load()?;
    let entries = EntryExtractor::new(&manifest, source_dir).entries();
    let files = FileClassifier::with_expander(&manifest, source_dir, expander)
      .classify()
      .with_context(|| {
        format!(
          "failed to classify files referenced by {}",
          manifest_path.display()
        )
      })?;

    info!(
      entries = entries.len(),
      files = files.len(),
      "derived bundler inputs from manifest"
    );

    let entries_json = serde_json::to_string_pretty(&entries)?;
    let files_json = serde_json::to_string_pretty(&files)?;
    let rerun_paths = vec![manifest_path.clone(), source_dir.as_path().to_path_buf()];

    Ok(ManifestArtifacts {
      entries,
      files,
      entries_json,
      files_json,
      rerun_paths,
    })
  }
}

impl ManifestAssetsBuilder {
  fn load(&self) -> Result<Manifest> {
    let BuildContext {
      manifest_path,
      source_dir,
    } = &self.context;

    let manifest = load_manifest(manifest_path)?;
    debug!(manifest = %manifest_path.display(), source_dir = %source_dir, "loaded manifest");
    Ok(manifest)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  #[test]
  fn builds_artifacts_for_project_layout() -> Result<()> {
    let temp = tempdir()?;
    let project = temp.path();
    write(
      project,
      "src/manifest.json",
      r#"{
        "manifest_version": 3,
        "background": {"service_worker": "bg.js"},
        "action": {"default_popup": "popup.html", "default_icon": "icon.png"},
        "web_accessible_resources": [{"resources": ["fonts/*.woff2", "inject.js"]}]
      }"#,
    );
    write(project, "src/fonts/a.woff2", "");

    let context = BuildContext::from_project(project, &ProjectConfig::default())?;
    let source_dir = context.source_dir.clone();
    let artifacts = ManifestAssetsBuilder::new(context).build()?;

    assert_eq!(artifacts.entries.background, source_dir.resolve("bg.js"));
    assert_eq!(artifacts.entries.popup, source_dir.resolve("popup.html"));
    assert_eq!(
      artifacts.files.js,
      vec![
        source_dir.resolve("inject.js").unwrap(),
        source_dir.resolve("bg.js").unwrap(),
      ]
    );
    assert_eq!(artifacts.files.img, vec![source_dir.resolve("icon.png").unwrap()]);
    assert_eq!(
      artifacts.files.others,
      vec![source_dir.resolve("fonts/a.woff2").unwrap()]
    );

    let entries: serde_json::Value = serde_json::from_str(&artifacts.entries_json)?;
    assert!(entries.get("background").is_some());
    let files: serde_json::Value = serde_json::from_str(&artifacts.files_json)?;
    assert_eq!(files["html"].as_array().map(Vec::len), Some(1));

    assert_eq!(artifacts.rerun_paths.len(), 2);
    assert!(artifacts.rerun_directives()[0].starts_with("cargo:rerun-if-changed="));
    assert!(artifacts.rerun_directives()[0].ends_with("manifest.json"));
    Ok(())
  }

  #[test]
  fn entries_do_not_require_the_source_dir() -> Result<()> {
    let temp = tempdir()?;
    write(
      temp.path(),
      "manifest.json",
      r#"{"devtools_page": "devtools.html"}"#,
    );
    let source_dir = SourceDir::new(temp.path().join("missing-src"))?;
    let builder = ManifestAssetsBuilder::new(BuildContext::new(
      temp.path().join("manifest.json"),
      source_dir.clone(),
    ));

    let entries = builder.entries()?;
    assert_eq!(entries.devtools, source_dir.resolve("devtools.html"));
    assert!(builder.build().is_err());
    Ok(())
  }

  #[test]
  fn missing_manifest_is_an_error() {
    let temp = tempdir().unwrap();
    let context = BuildContext::from_project(temp.path(), &ProjectConfig::default()).unwrap();

    let err = ManifestAssetsBuilder::new(context).build().unwrap_err();
    assert!(format!("{err:#}").contains("manifest not found"));
  }

  #[test]
  fn classification_failures_carry_manifest_context() {
    let temp = tempdir().unwrap();
    let project = temp.path();
    write(
      project,
      "src/manifest.json",
      r#"{"web_accessible_resources": [{"resources": ["img/***.png"]}]}"#,
    );

    let context = BuildContext::from_project(project, &ProjectConfig::default()).unwrap();
    let err = ManifestAssetsBuilder::new(context).build().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("failed to classify"));
    assert!(message.contains("img/***.png"));
  }
}
