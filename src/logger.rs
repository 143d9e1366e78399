//! Logging setup for the command line front end.
//!
//! Logs go to stderr so that JSON written to stdout stays machine readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATE_TARGET: &str = "webext_manifest_assets";

/// Initialise the global tracing subscriber.
///
/// `verbose` enables debug output for this crate and wins over `quiet`, which limits output
/// to errors. Otherwise `RUST_LOG` is honoured, falling back to info level.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
  let filter = if verbose {
    EnvFilter::new(format!("{CRATE_TARGET}=debug"))
  } else if quiet {
    EnvFilter::new("error")
  } else {
    EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new(format!("{CRATE_TARGET}=info")))
  };

  let fmt_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .with_level(true)
    .with_ansi(!no_color)
    .compact();

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt_layer)
    .init();
}
