//! Typed view over the extension manifest fields that reference files.
//!
//! Only the fields needed to derive bundler inputs are modelled. Every field is optional and
//! decoded through [`super::lenient`], so a field with an unexpected shape reads as absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::lenient;

/// Parsed extension manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
  /// Background service worker declaration.
  #[serde(default, deserialize_with = "lenient::block")]
  pub background: Option<Background>,
  /// Content scripts injected into matching pages, in declaration order.
  #[serde(default, deserialize_with = "lenient::block_sequence")]
  pub content_scripts: Vec<ContentScript>,
  /// Legacy full-page options document.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub options_page: Option<String>,
  /// Embedded options document.
  #[serde(default, deserialize_with = "lenient::block")]
  pub options_ui: Option<OptionsUi>,
  /// Toolbar action declaration.
  #[serde(default, deserialize_with = "lenient::block")]
  pub action: Option<Action>,
  /// Extension icons keyed by size label.
  #[serde(default, deserialize_with = "lenient::path_map")]
  pub icons: BTreeMap<String, String>,
  /// Pages replacing built-in browser pages.
  #[serde(default, deserialize_with = "lenient::block")]
  pub chrome_url_overrides: Option<UrlOverrides>,
  /// Developer tools extension page.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub devtools_page: Option<String>,
  /// Resources exposed to web pages, in declaration order.
  #[serde(default, deserialize_with = "lenient::block_sequence")]
  pub web_accessible_resources: Vec<WebAccessibleResource>,
}

/// `background` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Background {
  /// Service worker script path.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub service_worker: Option<String>,
}

/// Single `content_scripts` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentScript {
  /// Script paths injected by this entry.
  #[serde(default, deserialize_with = "lenient::path_sequence")]
  pub js: Vec<String>,
  /// Stylesheet paths injected by this entry.
  #[serde(default, deserialize_with = "lenient::path_sequence")]
  pub css: Vec<String>,
}

/// `options_ui` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OptionsUi {
  /// Options document path.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub page: Option<String>,
}

/// `action` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Action {
  /// Popup document shown when the toolbar button is clicked.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub default_popup: Option<String>,
  /// Toolbar icon, either one path or paths keyed by size label.
  #[serde(default, deserialize_with = "lenient::optional")]
  pub default_icon: Option<IconSet>,
}

/// Icon declaration accepted by `action.default_icon`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSet {
  /// A single icon path.
  Single(String),
  /// Icon paths keyed by size label.
  Sized(BTreeMap<String, String>),
}

impl IconSet {
  /// Every icon path declared by this set.
  pub fn paths(&self) -> Vec<&str> {
    match self {
      Self::Single(path) => vec![path.as_str()],
      Self::Sized(paths) => paths.values().map(String::as_str).collect(),
    }
  }
}

impl<'de> Deserialize<'de> for IconSet {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Value::deserialize(deserializer)? {
      value @ Value::String(_) => lenient::non_blank(value)
        .map(Self::Single)
        .ok_or_else(|| serde::de::Error::custom("blank icon path")),
      value @ Value::Object(_) => Ok(Self::Sized(lenient::string_entries(value))),
      _ => Err(serde::de::Error::custom(
        "expected an icon path or a map of icon paths",
      )),
    }
  }
}

/// `chrome_url_overrides` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UrlOverrides {
  /// Bookmark manager replacement.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub bookmarks: Option<String>,
  /// History page replacement.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub history: Option<String>,
  /// New tab page replacement.
  #[serde(default, deserialize_with = "lenient::optional_path")]
  pub newtab: Option<String>,
}

impl UrlOverrides {
  /// Declared override documents in `bookmarks`, `history`, `newtab` order.
  pub fn pages(&self) -> impl Iterator<Item = &str> {
    [&self.bookmarks, &self.history, &self.newtab]
      .into_iter()
      .filter_map(|page| page.as_deref())
  }
}

/// Single `web_accessible_resources` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebAccessibleResource {
  /// Literal paths or glob patterns relative to the source directory.
  #[serde(default, deserialize_with = "lenient::path_sequence")]
  pub resources: Vec<String>,
}

impl Manifest {
  /// Paths of every script declared across `content_scripts`.
  pub fn content_script_js(&self) -> impl Iterator<Item = &str> {
    self
      .content_scripts
      .iter()
      .flat_map(|script| script.js.iter().map(String::as_str))
  }

  /// Paths of every stylesheet declared across `content_scripts`.
  pub fn content_script_css(&self) -> impl Iterator<Item = &str> {
    self
      .content_scripts
      .iter()
      .flat_map(|script| script.css.iter().map(String::as_str))
  }

  /// Raw entries declared across `web_accessible_resources`, patterns included.
  pub fn declared_resources(&self) -> impl Iterator<Item = &str> {
    self
      .web_accessible_resources
      .iter()
      .flat_map(|entry| entry.resources.iter().map(String::as_str))
  }

  /// `background.service_worker`, when declared.
  pub fn service_worker(&self) -> Option<&str> {
    self.background.as_ref()?.service_worker.as_deref()
  }

  /// `options_ui.page`, when declared.
  pub fn options_ui_page(&self) -> Option<&str> {
    self.options_ui.as_ref()?.page.as_deref()
  }

  /// `action.default_popup`, when declared.
  pub fn default_popup(&self) -> Option<&str> {
    self.action.as_ref()?.default_popup.as_deref()
  }

  /// `action.default_icon`, when declared.
  pub fn default_icon(&self) -> Option<&IconSet> {
    self.action.as_ref()?.default_icon.as_ref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn manifest(value: Value) -> Manifest {
    serde_json::from_value(value).expect("manifest should decode")
  }

  #[test]
  fn empty_document_has_no_fields() {
    assert_eq!(manifest(json!({})), Manifest::default());
  }

  #[test]
  fn decodes_every_modelled_field() {
    let manifest = manifest(json!({
      "manifest_version": 3,
      "name": "demo",
      "background": {"service_worker": "bg.js", "type": "module"},
      "content_scripts": [
        {"matches": ["<all_urls>"], "js": ["a.js"], "css": ["a.css"]},
        {"js": ["b.js"]}
      ],
      "options_page": "options.html",
      "options_ui": {"page": "embedded.html", "open_in_tab": false},
      "action": {"default_popup": "popup.html", "default_icon": "icon.png"},
      "icons": {"16": "i16.png", "128": "i128.png"},
      "chrome_url_overrides": {"newtab": "tab.html"},
      "devtools_page": "devtools.html",
      "web_accessible_resources": [{"resources": ["img/*.png"], "matches": ["<all_urls>"]}]
    }));

    assert_eq!(manifest.service_worker(), Some("bg.js"));
    assert_eq!(manifest.content_script_js().collect::<Vec<_>>(), vec!["a.js", "b.js"]);
    assert_eq!(manifest.content_script_css().collect::<Vec<_>>(), vec!["a.css"]);
    assert_eq!(manifest.options_page.as_deref(), Some("options.html"));
    assert_eq!(manifest.options_ui_page(), Some("embedded.html"));
    assert_eq!(manifest.default_popup(), Some("popup.html"));
    assert_eq!(manifest.default_icon(), Some(&IconSet::Single("icon.png".into())));
    assert_eq!(manifest.icons.len(), 2);
    assert_eq!(
      manifest
        .chrome_url_overrides
        .as_ref()
        .map(|overrides| overrides.pages().collect::<Vec<_>>()),
      Some(vec!["tab.html"])
    );
    assert_eq!(manifest.devtools_page.as_deref(), Some("devtools.html"));
    assert_eq!(manifest.declared_resources().collect::<Vec<_>>(), vec!["img/*.png"]);
  }

  #[test]
  fn sized_icons_keep_string_values_only() {
    let manifest = manifest(json!({
      "action": {"default_icon": {"16": "a.png", "32": 7, "48": "b.png"}}
    }));

    let icons = manifest.default_icon().expect("icon set should decode");
    assert_eq!(icons.paths(), vec!["a.png", "b.png"]);
  }

  #[test]
  fn malformed_blocks_read_as_absent() {
    let manifest = manifest(json!({
      "background": "bg.js",
      "content_scripts": [{"js": "a.js"}, 5, {"js": ["ok.js"]}],
      "options_ui": [],
      "action": {"default_popup": 1, "default_icon": 2},
      "icons": "icon.png",
      "chrome_url_overrides": true,
      "web_accessible_resources": {"resources": ["x.png"]}
    }));

    assert!(manifest.background.is_none());
    assert_eq!(manifest.content_script_js().collect::<Vec<_>>(), vec!["ok.js"]);
    assert!(manifest.options_ui.is_none());
    assert!(manifest.default_popup().is_none());
    assert!(manifest.default_icon().is_none());
    assert!(manifest.icons.is_empty());
    assert!(manifest.chrome_url_overrides.is_none());
    assert!(manifest.web_accessible_resources.is_empty());
  }

  #[test]
  fn array_shaped_blocks_read_as_absent() {
    let manifest = manifest(json!({
      "background": ["bg.js"],
      "options_ui": ["opts.html"],
      "action": ["popup.html"],
      "chrome_url_overrides": ["bookmarks.html", "history.html", "newtab.html"],
      "content_scripts": [["a.js"], {"js": ["ok.js"]}],
      "web_accessible_resources": [[["x.png"]], {"resources": ["y.png"]}]
    }));

    assert!(manifest.background.is_none());
    assert!(manifest.options_ui.is_none());
    assert!(manifest.action.is_none());
    assert!(manifest.chrome_url_overrides.is_none());
    assert_eq!(manifest.content_script_js().collect::<Vec<_>>(), vec!["ok.js"]);
    assert_eq!(manifest.declared_resources().collect::<Vec<_>>(), vec!["y.png"]);
  }
}
