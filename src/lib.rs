#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod classify;
pub mod config;
pub mod entries;
pub mod logger;
pub mod manifest;
pub mod paths;

pub use builder::{BuildContext, ManifestArtifacts, ManifestAssetsBuilder};
pub use classify::{AssetCategory, ClassifiedFiles, ClassifyError, FileClassifier};
pub use entries::{EntryExtractor, EntryMap, OverrideEntries};
pub use manifest::Manifest;
pub use paths::SourceDir;
