//! Expansion of glob patterns declared as web-accessible resources.

use std::collections::BTreeSet;

use glob::MatchOptions;
use tracing::trace;

use super::error::ClassifyError;
use crate::paths::SourceDir;

/// Capability for turning a resource pattern into concrete files.
///
/// Implementations return forward-slash paths relative to the source directory, covering
/// existing files only. A pattern that matches nothing yields an empty list.
pub trait ResourceExpander {
  /// Expand `pattern` against `source_dir`.
  fn expand(&self, pattern: &str, source_dir: &SourceDir) -> Result<Vec<String>, ClassifyError>;

  /// Verify the source directory can be scanned before any pattern is expanded.
  fn ensure_source_dir(&self, source_dir: &SourceDir) -> Result<(), ClassifyError> {
    if source_dir.exists() {
      Ok(())
    } else {
      Err(ClassifyError::DirectoryNotFound {
        path: source_dir.as_path().to_path_buf(),
      })
    }
  }
}

/// Filesystem-backed expander using shell-style glob patterns.
///
/// `*` and `?` never cross a `/`, `**` spans directories, dotfiles are only matched by a
/// literal leading dot, and `{a,b}` alternation is expanded before matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobExpander;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: true,
};

impl ResourceExpander for GlobExpander {
  fn expand(&self, pattern: &str, source_dir: &SourceDir) -> Result<Vec<String>, ClassifyError> {
    let base = glob::Pattern::escape(&source_dir.as_path().to_string_lossy());
    let mut seen = BTreeSet::new();
    let mut matches = Vec::new();

    for alternative in expand_braces(pattern) {
      let full = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        alternative.trim_start_matches('/')
      );
      let paths =
        glob::glob_with(&full, MATCH_OPTIONS).map_err(|source| ClassifyError::InvalidPattern {
          pattern: pattern.to_string(),
          source,
        })?;

      let mut found = Vec::new();
      for entry in paths {
        let path = entry?;
        if !path.is_file() {
          continue;
        }
        if let Some(relative) = source_dir.relativize(&path) {
          found.push(relative);
        }
      }
      found.sort();

      for relative in found {
        if seen.insert(relative.clone()) {
          matches.push(relative);
        }
      }
    }

    trace!(pattern, matches = matches.len(), "expanded resource pattern");
    Ok(matches)
  }
}

/// Whether a declared resource should be expanded rather than used literally.
pub fn is_glob_pattern(value: &str) -> bool {
  value.contains(['*', '?', '[', '{'])
}

/// Expand `{a,b}` alternation groups, including nested groups, into plain glob patterns.
///
/// Groups without a top-level comma are kept literally. Duplicate expansions are dropped,
/// keeping the first occurrence.
pub fn expand_braces(pattern: &str) -> Vec<String> {
  let Some((open, close)) = find_brace_group(pattern) else {
    return vec![pattern.to_string()];
  };

  let prefix = &pattern[..open];
  let body = &pattern[open + 1..close];
  let suffix = &pattern[close + 1..];

  let alternatives = split_alternatives(body);
  if alternatives.len() < 2 {
    return expand_braces(suffix)
      .into_iter()
      .map(|rest| format!("{prefix}{{{body}}}{rest}"))
      .collect();
  }

  let mut expanded: Vec<String> = Vec::new();
  for alternative in alternatives {
    for candidate in expand_braces(&format!("{prefix}{alternative}{suffix}")) {
      if !expanded.contains(&candidate) {
        expanded.push(candidate);
      }
    }
  }
  expanded
}

fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
  let mut depth = 0usize;
  let mut start = 0usize;
  for (index, ch) in pattern.char_indices() {
    match ch {
      '{' => {
        if depth == 0 {
          start = index;
        }
        depth += 1;
      }
      '}' if depth > 0 => {
        depth -= 1;
        if depth == 0 {
          return Some((start, index));
        }
      }
      _ => {}
    }
  }
  None
}

fn split_alternatives(body: &str) -> Vec<&str> {
  let mut parts = Vec::new();
  let mut depth = 0usize;
  let mut start = 0usize;
  for (index, ch) in body.char_indices() {
    match ch {
      '{' => depth += 1,
      '}' if depth > 0 => depth -= 1,
      ',' if depth == 0 => {
        parts.push(&body[start..index]);
        start = index + 1;
      }
      _ => {}
    }
  }
  parts.push(&body[start..]);
  parts
}
