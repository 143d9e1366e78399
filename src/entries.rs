//! Bundler entry points derived from manifest fields.
//!
//! Each accessor on [`EntryExtractor`] reads one manifest role and resolves it against the
//! source directory. Accessors never fail: an absent, blank or malformed field simply yields no
//! entry. Nothing here reads the filesystem.

use std::path::PathBuf;

use serde::Serialize;

use crate::manifest::Manifest;
use crate::paths::SourceDir;

/// Resolved entry points keyed by manifest role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryMap {
  /// Background service worker.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub background: Option<PathBuf>,
  /// Content scripts across every `content_scripts` entry.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content_scripts: Option<Vec<PathBuf>>,
  /// Legacy options page.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub options_page: Option<PathBuf>,
  /// Embedded options page.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub options_ui: Option<PathBuf>,
  /// Toolbar popup.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub popup: Option<PathBuf>,
  /// Browser page overrides.
  #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
  pub overrides: Option<OverrideEntries>,
  /// Developer tools page.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub devtools: Option<PathBuf>,
  /// Web-accessible resources, unexpanded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub web_accessible_resources: Option<Vec<PathBuf>>,
}

impl EntryMap {
  /// Number of roles with an entry.
  pub fn len(&self) -> usize {
    [
      self.background.is_some(),
      self.content_scripts.is_some(),
      self.options_page.is_some(),
      self.options_ui.is_some(),
      self.popup.is_some(),
      self.overrides.is_some(),
      self.devtools.is_some(),
      self.web_accessible_resources.is_some(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count()
  }

  /// Returns true when no role has an entry.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Resolved `chrome_url_overrides` pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideEntries {
  /// Bookmark manager replacement.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bookmarks: Option<PathBuf>,
  /// History page replacement.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub history: Option<PathBuf>,
  /// New tab page replacement.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub newtab: Option<PathBuf>,
}

/// Reads entry points out of a manifest.
#[derive(Debug, Clone, Copy)]
pub struct EntryExtractor<'a> {
  manifest: &'a Manifest,
  source_dir: &'a SourceDir,
}

impl<'a> EntryExtractor<'a> {
  /// Create an extractor for `manifest`, resolving paths against `source_dir`.
  pub fn new(manifest: &'a Manifest, source_dir: &'a SourceDir) -> Self {
    Self {
      manifest,
      source_dir,
    }
  }

  /// Every role that has an entry.
  pub fn entries(&self) -> EntryMap {
    EntryMap {
      background: self.background(),
      content_scripts: self.content_scripts(),
      options_page: self.options_page(),
      options_ui: self.options_ui(),
      popup: self.popup(),
      overrides: self.overrides(),
      devtools: self.devtools(),
      web_accessible_resources: self.web_accessible_resources(),
    }
  }

  /// `background.service_worker`.
  pub fn background(&self) -> Option<PathBuf> {
    self.resolve(self.manifest.service_worker())
  }

  /// Every `content_scripts[*].js` path, flattened in declaration order.
  pub fn content_scripts(&self) -> Option<Vec<PathBuf>> {
    self.resolve_all(self.manifest.content_script_js())
  }

  /// `options_page`.
  pub fn options_page(&self) -> Option<PathBuf> {
    self.resolve(self.manifest.options_page.as_deref())
  }

  /// `options_ui.page`.
  pub fn options_ui(&self) -> Option<PathBuf> {
    self.resolve(self.manifest.options_ui_page())
  }

  /// `action.default_popup`.
  pub fn popup(&self) -> Option<PathBuf> {
    self.resolve(self.manifest.default_popup())
  }

  /// `chrome_url_overrides`, keyed the same way as the manifest.
  pub fn overrides(&self) -> Option<OverrideEntries> {
    let overrides = self.manifest.chrome_url_overrides.as_ref()?;
    let entries = OverrideEntries {
      bookmarks: self.resolve(overrides.bookmarks.as_deref()),
      history: self.resolve(overrides.history.as_deref()),
      newtab: self.resolve(overrides.newtab.as_deref()),
    };

    if entries == OverrideEntries::default() {
      None
    } else {
      Some(entries)
    }
  }

  /// `devtools_page`.
  pub fn devtools(&self) -> Option<PathBuf> {
    self.resolve(self.manifest.devtools_page.as_deref())
  }

  /// Every `web_accessible_resources[*].resources` entry, resolved literally.
  pub fn web_accessible_resources(&self) -> Option<Vec<PathBuf>> {
    self.resolve_all(self.manifest.declared_resources())
  }

  fn resolve(&self, relative: Option<&str>) -> Option<PathBuf> {
    self.source_dir.resolve(relative?)
  }

  fn resolve_all<'p>(&self, paths: impl Iterator<Item = &'p str>) -> Option<Vec<PathBuf>> {
    let resolved: Vec<PathBuf> = paths
      .filter_map(|path| self.source_dir.resolve(path))
      .collect();
    (!resolved.is_empty()).then_some(resolved)
  }
}
