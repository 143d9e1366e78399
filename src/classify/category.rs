//! Extension-to-category table used to bucket web-accessible resources.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Asset bucket a referenced file is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
  /// Scripts run through the script transform.
  Script,
  /// Stylesheets run through the stylesheet transform.
  Stylesheet,
  /// Markup documents copied as-is.
  Markup,
  /// Images copied as-is.
  Image,
  /// Anything else copied as-is.
  Other,
}

const SCRIPT_SUFFIXES: &[&str] = &[".js", ".jsx", ".ts", ".tsx"];
const STYLESHEET_SUFFIXES: &[&str] = &[".css"];
const MARKUP_SUFFIXES: &[&str] = &[".html", ".htm"];

fn image_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(?i)\.(jpe?g|png|svg|tiff?|gif|webp|bmp|ico)$").expect("invalid image regex")
  })
}

impl AssetCategory {
  /// All categories in bucket order.
  pub const ALL: [AssetCategory; 5] = [
    Self::Script,
    Self::Stylesheet,
    Self::Markup,
    Self::Image,
    Self::Other,
  ];

  /// Categorise a path by its suffix.
  ///
  /// Script, stylesheet and markup suffixes match case-sensitively, image extensions match
  /// regardless of case, and everything else is [`AssetCategory::Other`].
  pub fn of(path: &str) -> Self {
    if ends_with_any(path, SCRIPT_SUFFIXES) {
      Self::Script
    } else if ends_with_any(path, STYLESHEET_SUFFIXES) {
      Self::Stylesheet
    } else if ends_with_any(path, MARKUP_SUFFIXES) {
      Self::Markup
    } else if image_pattern().is_match(path) {
      Self::Image
    } else {
      Self::Other
    }
  }

  /// Bucket name used in serialised output.
  pub fn bucket_name(self) -> &'static str {
    match self {
      Self::Script => "js",
      Self::Stylesheet => "css",
      Self::Markup => "html",
      Self::Image => "img",
      Self::Other => "others",
    }
  }
}

fn ends_with_any(path: &str, suffixes: &[&str]) -> bool {
  suffixes.iter().any(|suffix| path.ends_with(suffix))
}

impl fmt::Display for AssetCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.bucket_name())
  }
}
