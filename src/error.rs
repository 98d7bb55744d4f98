//! Error types raised while packaging or validating a standalone artifact.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the fatal stages of the pipeline.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Fatal failures that abort a bundling run before any output is written.
#[derive(Debug, Error)]
pub enum BundleError {
  /// The configured build directory does not exist or is not a directory.
  #[error("build directory not found: {}", path.display())]
  BuildDirNotFound {
    /// Path that was probed.
    path: PathBuf,
  },

  /// None of the entry document candidates exist in the build directory.
  #[error(
    "no entry document found in {} (tried {})",
    build_dir.display(),
    candidates.join(", ")
  )]
  EntryNotFound {
    /// Build directory that was searched.
    build_dir: PathBuf,
    /// Candidate relative paths in probing order.
    candidates: Vec<String>,
  },

  /// The entry document exists but could not be read as UTF-8 text.
  #[error("failed to read entry document {}", path.display())]
  EntryUnreadable {
    /// Absolute path of the entry document.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },

  /// Structural assembly requires an element the entry document lacks.
  #[error("could not parse entry document structure: missing <{element}> section")]
  StructureNotFound {
    /// Name of the missing element.
    element: &'static str,
  },

  /// The artifact could not be written to its output path.
  #[error("failed to write {}", path.display())]
  Write {
    /// Output path.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },

  /// A configuration file could not be read.
  #[error("failed to read config {}", path.display())]
  ConfigRead {
    /// Config file path.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },

  /// A configuration file is not valid JSON for [`crate::config::BundleConfig`].
  #[error("failed to parse config {}", path.display())]
  ConfigParse {
    /// Config file path.
    path: PathBuf,
    /// Underlying parse failure.
    #[source]
    source: serde_json::Error,
  },
}

/// Non-fatal failure tied to a single asset. The asset is treated as absent.
#[derive(Debug, Error)]
pub enum AssetError {
  /// The file could not be read or stat'ed.
  #[error("failed to read {relative_path}: {source}")]
  Read {
    /// Catalog-relative path of the asset.
    relative_path: String,
    /// Underlying I/O failure.
    source: std::io::Error,
  },

  /// A style or script file is not valid UTF-8.
  #[error("failed to decode {relative_path}: not valid UTF-8")]
  InvalidUtf8 {
    /// Catalog-relative path of the asset.
    relative_path: String,
  },

  /// A directory entry could not be visited during the walk.
  #[error("failed to scan {}: {message}", path.display())]
  Scan {
    /// Path being visited, when known.
    path: PathBuf,
    /// Description of the walk failure.
    message: String,
  },
}
