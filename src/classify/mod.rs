//! Bucketing of manifest-referenced files by asset type.
//!
//! Classification runs in two phases. Web-accessible resources are first flattened into a
//! working list, expanding glob patterns through a [`ResourceExpander`]. Every manifest field
//! that references a file is then routed into one of five buckets: web-accessible resources
//! by suffix through [`AssetCategory::of`], every other field by the role it plays in the
//! manifest. Each bucket is deduplicated on the resolved absolute path, first occurrence wins,
//! and `others` only keeps paths no other bucket claims.

mod category;
mod error;
mod expand;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

pub use category::AssetCategory;
pub use error::ClassifyError;
pub use expand::{GlobExpander, ResourceExpander, expand_braces, is_glob_pattern};

use crate::manifest::Manifest;
use crate::paths::SourceDir;

/// Absolute file paths grouped by asset bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedFiles {
  /// Scripts.
  pub js: Vec<PathBuf>,
  /// Stylesheets.
  pub css: Vec<PathBuf>,
  /// Markup documents.
  pub html: Vec<PathBuf>,
  /// Images.
  pub img: Vec<PathBuf>,
  /// Web-accessible resources claimed by no other bucket.
  pub others: Vec<PathBuf>,
}

impl ClassifiedFiles {
  /// Paths in the bucket for `category`.
  pub fn get(&self, category: AssetCategory) -> &[PathBuf] {
    match category {
      AssetCategory::Script => &self.js,
      AssetCategory::Stylesheet => &self.css,
      AssetCategory::Markup => &self.html,
      AssetCategory::Image => &self.img,
      AssetCategory::Other => &self.others,
    }
  }

  fn get_mut(&mut self, category: AssetCategory) -> &mut Vec<PathBuf> {
    match category {
      AssetCategory::Script => &mut self.js,
      AssetCategory::Stylesheet => &mut self.css,
      AssetCategory::Markup => &mut self.html,
      AssetCategory::Image => &mut self.img,
      AssetCategory::Other => &mut self.others,
    }
  }

  /// Iterate buckets in `js`, `css`, `html`, `img`, `others` order.
  pub fn iter(&self) -> impl Iterator<Item = (AssetCategory, &[PathBuf])> {
    AssetCategory::ALL
      .into_iter()
      .map(move |category| (category, self.get(category)))
  }

  /// Total number of paths across all buckets.
  pub fn len(&self) -> usize {
    self.iter().map(|(_, paths)| paths.len()).sum()
  }

  /// Returns true when every bucket is empty.
  pub fn is_empty(&self) -> bool {
    self.iter().all(|(_, paths)| paths.is_empty())
  }
}

/// Derives [`ClassifiedFiles`] from a manifest.
pub struct FileClassifier<'a, E = GlobExpander> {
  manifest: &'a Manifest,
  source_dir: &'a SourceDir,
  expander: E,
}

impl<'a> FileClassifier<'a> {
  /// Create a classifier that expands patterns against the real filesystem.
  pub fn new(manifest: &'a Manifest, source_dir: &'a SourceDir) -> Self {
    Self::with_expander(manifest, source_dir, GlobExpander)
  }
}

impl<'a, E: ResourceExpander> FileClassifier<'a, E> {
  /// Create a classifier using a custom pattern expander.
  pub fn with_expander(manifest: &'a Manifest, source_dir: &'a SourceDir, expander: E) -> Self {
    Self {
      manifest,
      source_dir,
      expander,
    }
  }

  /// Flatten `web_accessible_resources` into relative paths, expanding glob patterns.
  ///
  /// Literal entries pass through unchanged. Order follows manifest declaration, then match
  /// order within each pattern.
  pub fn web_accessible_resources(&self) -> Result<Vec<String>, ClassifyError> {
    let mut resources = Vec::new();
    for declared in self.manifest.declared_resources() {
      if is_glob_pattern(declared) {
        let matches = self.expander.expand(declared, self.source_dir)?;
        debug!(
          pattern = declared,
          matches = matches.len(),
          "expanded web accessible resource pattern"
        );
        resources.extend(matches);
      } else {
        resources.push(declared.to_string());
      }
    }
    Ok(resources)
  }

  /// Classify every file referenced by the manifest.
  ///
  /// Fails fast on the first pattern that cannot be expanded; no partial result is returned.
  pub fn classify(&self) -> Result<ClassifiedFiles, ClassifyError> {
    self.expander.ensure_source_dir(self.source_dir)?;
    let resources = self.web_accessible_resources()?;
    let manifest = self.manifest;

    let mut buckets = BucketBuilder::new(self.source_dir);

    if let Some(icons) = manifest.default_icon() {
      buckets.extend(AssetCategory::Image, icons.paths());
    }

    for resource in &resources {
      buckets.push(AssetCategory::of(resource), resource);
    }

    buckets.extend(AssetCategory::Script, manifest.service_worker());
    buckets.extend(AssetCategory::Script, manifest.content_script_js());

    buckets.extend(AssetCategory::Markup, manifest.options_page.as_deref());
    buckets.extend(AssetCategory::Markup, manifest.options_ui_page());
    buckets.extend(AssetCategory::Markup, manifest.devtools_page.as_deref());
    buckets.extend(AssetCategory::Markup, manifest.default_popup());
    if let Some(overrides) = &manifest.chrome_url_overrides {
      buckets.extend(AssetCategory::Markup, overrides.pages());
    }

    buckets.extend(AssetCategory::Stylesheet, manifest.content_script_css());

    buckets.extend(
      AssetCategory::Image,
      manifest.icons.values().map(String::as_str),
    );

    let files = buckets.finish();
    debug!(
      js = files.js.len(),
      css = files.css.len(),
      html = files.html.len(),
      img = files.img.len(),
      others = files.others.len(),
      "classified manifest files"
    );
    Ok(files)
  }
}

struct BucketBuilder<'a> {
  source_dir: &'a SourceDir,
  seen: BTreeSet<(AssetCategory, PathBuf)>,
  files: ClassifiedFiles,
}

impl<'a> BucketBuilder<'a> {
  fn new(source_dir: &'a SourceDir) -> Self {
    Self {
      source_dir,
      seen: BTreeSet::new(),
      files: ClassifiedFiles::default(),
    }
  }

  fn extend<'p>(&mut self, category: AssetCategory, paths: impl IntoIterator<Item = &'p str>) {
    for path in paths {
      self.push(category, path);
    }
  }

  fn push(&mut self, category: AssetCategory, relative: &str) {
    let Some(path) = self.source_dir.resolve(relative) else {
      return;
    };

    if self.seen.insert((category, path.clone())) {
      self.files.get_mut(category).push(path);
    }
  }

  /// Drop from `others` every path another bucket already claims.
  fn finish(mut self) -> ClassifiedFiles {
    let claimed: BTreeSet<&PathBuf> = self
      .seen
      .iter()
      .filter(|(category, _)| *category != AssetCategory::Other)
      .map(|(_, path)| path)
      .collect();
    self.files.others.retain(|path| !claimed.contains(path));
    self.files
  }
}
