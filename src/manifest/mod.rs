//! Extension manifest model, permissive field decoding, and loading.

pub mod lenient;
mod loader;
mod schema;

pub use loader::load_manifest;
pub use schema::{
  Action, Background, ContentScript, IconSet, Manifest, OptionsUi, UrlOverrides,
  WebAccessibleResource,
};
