//! Source directory handling and manifest path resolution.
//!
//! Manifest paths are always interpreted relative to the extension source directory. Resolution
//! is purely lexical: nothing here touches the filesystem apart from [`SourceDir::exists`].

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute, lexically normalised extension source directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceDir {
  root: PathBuf,
}

impl SourceDir {
  /// Create a source directory, making relative paths absolute against the working directory.
  pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
    let absolute = std::path::absolute(path.as_ref())?;
    Ok(Self {
      root: normalise_absolute(&absolute),
    })
  }

  /// Absolute path of the directory.
  pub fn as_path(&self) -> &Path {
    &self.root
  }

  /// Whether the directory currently exists on disk.
  pub fn exists(&self) -> bool {
    self.root.is_dir()
  }

  /// Resolve a manifest-declared path against the source directory.
  ///
  /// Backslashes are treated as separators, leading slashes are ignored, and `..` segments
  /// can only unwind segments introduced by `relative` itself, so the result always lives
  /// below the source directory. Returns `None` when nothing but the directory itself
  /// would be referenced.
  pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
    let segments = relative_segments(relative);
    if segments.is_empty() {
      return None;
    }

    let mut resolved = self.root.clone();
    resolved.extend(segments);
    Some(resolved)
  }

  /// Express a path below the source directory as a forward-slash relative string.
  ///
  /// `.` and `..` segments are folded lexically. Returns `None` when the path is not below the
  /// source directory, including paths that climb out of it through `..`.
  pub fn relativize(&self, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(&self.root).ok()?;

    let mut segments: Vec<String> = Vec::new();
    for component in relative.components() {
      match component {
        Component::CurDir => {}
        Component::ParentDir => {
          segments.pop()?;
        }
        Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
        Component::RootDir | Component::Prefix(_) => return None,
      }
    }

    if segments.is_empty() {
      return None;
    }
    Some(segments.join("/"))
  }
}

impl AsRef<Path> for SourceDir {
  fn as_ref(&self) -> &Path {
    &self.root
  }
}

impl fmt::Display for SourceDir {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.root.display())
  }
}

fn relative_segments(relative: &str) -> Vec<&str> {
  let mut segments = Vec::new();
  for segment in relative.split(['/', '\\']) {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop();
      }
      other => segments.push(other),
    }
  }
  segments
}

fn normalise_absolute(path: &Path) -> PathBuf {
  let mut normalised = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if matches!(
          normalised.components().next_back(),
          Some(Component::Normal(_))
        ) {
          normalised.pop();
        }
      }
      other => normalised.push(other.as_os_str()),
    }
  }
  normalised
}

#[cfg(test)]
mod tests {
  use super::*;

  fn src() -> SourceDir {
    SourceDir::new("/ext").unwrap()
  }

  #[test]
  fn joins_relative_paths() {
    assert_eq!(src().resolve("bg.js"), Some(PathBuf::from("/ext/bg.js")));
    assert_eq!(
      src().resolve("pages/popup.html"),
      Some(PathBuf::from("/ext/pages/popup.html"))
    );
  }

  #[test]
  fn normalises_backslashes_from_windows_inputs() {
    assert_eq!(
      src().resolve("images\\icons\\16.png"),
      Some(PathBuf::from("/ext/images/icons/16.png"))
    );
  }

  #[test]
  fn leading_slashes_stay_inside_source_dir() {
    assert_eq!(src().resolve("/bg.js"), Some(PathBuf::from("/ext/bg.js")));
    assert_eq!(src().resolve("./a/./b.js"), Some(PathBuf::from("/ext/a/b.js")));
  }

  #[test]
  fn parent_segments_cannot_escape() {
    assert_eq!(src().resolve("a/../b.js"), Some(PathBuf::from("/ext/b.js")));
    assert_eq!(src().resolve("../../etc/passwd"), Some(PathBuf::from("/ext/etc/passwd")));
  }

  #[test]
  fn blank_or_directory_references_resolve_to_nothing() {
    assert_eq!(src().resolve(""), None);
    assert_eq!(src().resolve("./"), None);
    assert_eq!(src().resolve(".."), None);
  }

  #[test]
  fn source_dir_is_normalised() {
    let dir = SourceDir::new("/ext/./nested/../").unwrap();
    assert_eq!(dir.as_path(), Path::new("/ext"));
  }

  #[test]
  fn relative_source_dirs_become_absolute() {
    let dir = SourceDir::new("ext").unwrap();
    assert!(dir.as_path().is_absolute());
    assert!(dir.as_path().ends_with("ext"));
  }

  #[test]
  fn relativize_inverts_resolve() {
    let dir = src();
    let resolved = dir.resolve("assets/x.png").unwrap();
    assert_eq!(dir.relativize(&resolved).as_deref(), Some("assets/x.png"));
    assert_eq!(dir.relativize(Path::new("/other/x.png")), None);
    assert_eq!(dir.relativize(Path::new("/ext")), None);
  }

  #[test]
  fn relativize_rejects_paths_escaping_source_dir() {
    let dir = src();
    assert_eq!(dir.relativize(Path::new("/ext/../outside/a.png")), None);
    assert_eq!(dir.relativize(Path::new("/ext/a/../../b.png")), None);
    assert_eq!(
      dir.relativize(Path::new("/ext/a/../b.png")).as_deref(),
      Some("b.png")
    );
  }
}
