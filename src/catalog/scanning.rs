//! Directory walk and per-file admission rules.

use std::path::PathBuf;

use same_file::is_same_file;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::asset_paths::make_catalog_key;
use crate::error::AssetError;
use crate::hooks::BundleHooks;
use crate::models::AssetKind;
use crate::project::{BundleOptions, extension_of};

/// Why a file was left out of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// Extension is on the skip list.
  SkipExtension,
  /// File is larger than the size cap.
  Oversized,
  /// Extension is neither style, script nor inlineable.
  Unsupported,
}

/// Classification of a single file, evaluated in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
  /// The file is an entry document candidate and belongs to the assembler.
  Entry,
  /// The file is excluded.
  Skip(SkipReason),
  /// The file is cataloged with the given encoding.
  Admit(AssetKind),
}

/// Classify a file from its catalog key, extension and size.
pub fn classify(
  relative_path: &str,
  extension: Option<&str>,
  size: u64,
  options: &BundleOptions,
) -> Admission {
  if options.is_entry_candidate(relative_path) {
    return Admission::Entry;
  }

  let extension = extension.unwrap_or_default();
  if options.skip_extensions.contains(extension) {
    return Admission::Skip(SkipReason::SkipExtension);
  }
  if size > options.max_asset_size {
    return Admission::Skip(SkipReason::Oversized);
  }
  if options.style_extensions.contains(extension) {
    Admission::Admit(AssetKind::Style)
  } else if options.script_extensions.contains(extension) {
    Admission::Admit(AssetKind::Script)
  } else if options.inline_extensions.contains(extension) {
    Admission::Admit(AssetKind::Binary)
  } else {
    Admission::Skip(SkipReason::Unsupported)
  }
}

/// A file admitted to the catalog but not read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsset {
  /// Catalog key.
  pub relative_path: String,
  /// Absolute path on disk.
  pub source_path: PathBuf,
  /// Encoding to apply.
  pub kind: AssetKind,
  /// Size reported by the walk.
  pub size: u64,
}

/// Everything discovered by [`discover_assets`].
#[derive(Debug, Default)]
pub struct ScanOutcome {
  /// Admitted files in walk order.
  pub pending: Vec<PendingAsset>,
  /// Files excluded by the skip list, size cap, type or a hook veto.
  pub skipped: usize,
  /// Entries that could not be visited or stat'ed.
  pub errors: Vec<AssetError>,
}

/// Walk the build directory and classify every regular file without reading contents.
pub fn discover_assets<H: BundleHooks>(options: &BundleOptions, hooks: &H) -> ScanOutcome {
  let mut outcome = ScanOutcome::default();
  let root = &options.build_dir;

  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = match entry {
      Ok(entry) => entry,
      Err(err) => {
        let path = err
          .path()
          .map(|path| path.to_path_buf())
          .unwrap_or_else(|| root.clone());
        warn!("Failed to scan {}: {err}", path.display());
        outcome.errors.push(AssetError::Scan {
          path,
          message: err.to_string(),
        });
        continue;
      }
    };

    if !entry.file_type().is_file() {
      continue;
    }

    let path = entry.path();
    let Ok(relative) = path.strip_prefix(root) else {
      continue;
    };
    let key = make_catalog_key(relative);

    if is_same_file(path, &options.output_file).unwrap_or(false) {
      debug!("Ignoring previous artifact at {key}");
      continue;
    }

    let size = match entry.metadata() {
      Ok(metadata) => metadata.len(),
      Err(err) => {
        let error = AssetError::Read {
          relative_path: key,
          source: err.into(),
        };
        warn!("{error}");
        outcome.errors.push(error);
        continue;
      }
    };

    let extension = extension_of(path);
    match classify(&key, extension.as_deref(), size, options) {
      Admission::Entry => debug!("Reserved entry document candidate: {key}"),
      Admission::Skip(SkipReason::SkipExtension) => {
        debug!("Skipping file: {key}");
        outcome.skipped += 1;
      }
      Admission::Skip(SkipReason::Oversized) => {
        warn!(
          "Skipping large file: {key} ({:.2}MB)",
          size as f64 / 1024.0 / 1024.0
        );
        outcome.skipped += 1;
      }
      Admission::Skip(SkipReason::Unsupported) => {
        warn!("Skipping unsupported file: {key}");
        outcome.skipped += 1;
      }
      Admission::Admit(kind) => {
        if !hooks.before_asset(&key, path) {
          info!("Skipping file rejected by hook: {key}");
          outcome.skipped += 1;
          continue;
        }
        outcome.pending.push(PendingAsset {
          relative_path: key,
          source_path: path.to_path_buf(),
          kind,
          size,
        });
      }
    }
  }

  outcome
}
