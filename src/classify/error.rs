use std::io;
use std::path::PathBuf;

/// Errors that abort file classification.
///
/// Absent or malformed manifest fields never produce an error; only a misconfigured build
/// (bad pattern, missing or unreadable source directory) does.
#[derive(Debug)]
pub enum ClassifyError {
  /// A web-accessible resource pattern could not be compiled.
  InvalidPattern {
    /// Pattern as declared in the manifest.
    pattern: String,
    /// Source pattern error.
    source: glob::PatternError,
  },
  /// The source directory does not exist or is not a directory.
  DirectoryNotFound {
    /// Directory that was expected.
    path: PathBuf,
  },
  /// A directory could not be read while expanding a pattern.
  Unreadable {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
}

impl std::fmt::Display for ClassifyError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::InvalidPattern { pattern, source } => {
        write!(f, "invalid resource pattern {pattern:?}: {source}")
      }
      Self::DirectoryNotFound { path } => {
        write!(f, "source directory not found: {}", path.display())
      }
      Self::Unreadable { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for ClassifyError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::InvalidPattern { source, .. } => Some(source),
      Self::DirectoryNotFound { .. } => None,
      Self::Unreadable { source, .. } => Some(source),
    }
  }
}

impl From<glob::GlobError> for ClassifyError {
  fn from(err: glob::GlobError) -> Self {
    let path = err.path().to_path_buf();
    Self::Unreadable {
      path,
      source: io::Error::from(err),
    }
  }
}
