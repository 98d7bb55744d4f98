//! Standalone bundler CLI
//!
//! Packages a static export into one self-contained HTML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use standalone_bundler::{BundleConfig, StandaloneBuilder};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Package a static single-page-app export into one self-contained HTML file
#[derive(Parser)]
#[command(name = "standalone-bundle")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Directory holding the static export (default: ./out)
  #[arg(short, long)]
  build_dir: Option<PathBuf>,

  /// Path of the generated HTML file (default: ./standalone.html)
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Skip assets larger than this many megabytes (default: 1)
  #[arg(long, value_name = "MB")]
  max_size: Option<u64>,

  /// JSON configuration file (default: ./standalone.config.json when present)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Only log warnings and errors
  #[arg(short, long, conflicts_with = "verbose")]
  quiet: bool,

  /// Log every processed and skipped file
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else if cli.quiet {
    EnvFilter::new("warn")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = match &cli.config {
    Some(path) => BundleConfig::load(path)?,
    None => BundleConfig::discover(Path::new("."))?,
  };

  let mut options = config.into_options();
  if let Some(build_dir) = cli.build_dir {
    options.build_dir = build_dir;
  }
  if let Some(output) = cli.output {
    options.output_file = output;
  }
  if let Some(max_size) = cli.max_size {
    options.max_asset_size = max_size.saturating_mul(BYTES_PER_MB);
  }

  let summary = StandaloneBuilder::new(options)
    .build()
    .context("standalone build failed")?;

  println!(
    "Standalone HTML written to {} ({:.2}MB, {} inlined, {} skipped, {} errors)",
    summary.output_file.display(),
    summary.output_size as f64 / BYTES_PER_MB as f64,
    summary.inlined,
    summary.skipped,
    summary.errors.len()
  );
  Ok(())
}
