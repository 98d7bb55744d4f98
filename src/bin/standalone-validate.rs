//! Standalone artifact validator CLI
//!
//! Exits with status 0 when the artifact passes and 1 when any check fails.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use standalone_bundler::Validator;
use standalone_bundler::project::DEFAULT_OUTPUT_FILE;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Check that a generated HTML file has no remaining external dependencies
#[derive(Parser)]
#[command(name = "standalone-validate")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Artifact to validate
  #[arg(default_value = DEFAULT_OUTPUT_FILE)]
  path: PathBuf,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let report = Validator::new().validate_file(&cli.path);
  print!("{}", report.render());

  if report.passed() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}
