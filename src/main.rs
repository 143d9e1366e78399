//! Command line front end printing the bundler inputs derived from an extension manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

use webext_manifest_assets::config::ProjectConfig;
use webext_manifest_assets::logger::init_logger;
use webext_manifest_assets::{BuildContext, ManifestAssetsBuilder, SourceDir};

#[derive(Debug, Parser)]
#[command(name = "webext-assets", version, about)]
struct Cli {
  /// Project directory containing the optional `webext.config.json`.
  #[arg(long, default_value = ".")]
  project: PathBuf,
  /// Extension source directory, overriding the project configuration.
  #[arg(long)]
  source_dir: Option<PathBuf>,
  /// Manifest file, overriding the project configuration.
  #[arg(long)]
  manifest: Option<PathBuf>,
  /// Enable debug logging.
  #[arg(short, long)]
  verbose: bool,
  /// Only log errors.
  #[arg(short, long, conflicts_with = "verbose")]
  quiet: bool,
  /// Disable coloured log output.
  #[arg(long)]
  no_color: bool,
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, Subcommand)]
enum Command {
  /// Print entry points keyed by manifest role.
  Entries,
  /// Print referenced files bucketed by asset type.
  Classify,
  /// Print both entry points and asset buckets.
  #[default]
  All,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logger(cli.verbose, cli.quiet, cli.no_color);

  let config = ProjectConfig::discover(&cli.project);
  let source_path = cli
    .source_dir
    .clone()
    .unwrap_or_else(|| config.source_dir_path(&cli.project));
  let source_dir = SourceDir::new(&source_path)
    .with_context(|| format!("failed to resolve source directory {}", source_path.display()))?;
  let manifest_path = cli
    .manifest
    .clone()
    .unwrap_or_else(|| source_dir.as_path().join(&config.manifest_file));
  debug!(manifest = %manifest_path.display(), source_dir = %source_dir, "resolved inputs");

  let builder = ManifestAssetsBuilder::new(BuildContext::new(manifest_path, source_dir));

  let output = match cli.command.unwrap_or_default() {
    Command::Entries => serde_json::to_value(builder.entries()?)?,
    Command::Classify => serde_json::to_value(builder.build()?.files)?,
    Command::All => {
      let artifacts = builder.build()?;
      json!({
        "entries": artifacts.entries,
        "files": artifacts.files,
      })
    }
  };

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}
