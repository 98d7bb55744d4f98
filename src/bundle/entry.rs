//! Entry document discovery.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{BundleError, Result};
use crate::project::BundleOptions;

/// Probe the configured candidates in order and return the first existing entry document.
pub fn locate_entry(options: &BundleOptions) -> Result<PathBuf> {
  for candidate in &options.entry_candidates {
    let path = options.build_dir.join(candidate);
    if path.is_file() {
      info!("Found entry document at: {}", path.display());
      return Ok(path);
    }
  }

  Err(BundleError::EntryNotFound {
    build_dir: options.build_dir.clone(),
    candidates: options.entry_candidates.clone(),
  })
}

/// Locate and read the entry document.
pub fn read_entry(options: &BundleOptions) -> Result<String> {
  let path = locate_entry(options)?;
  fs::read_to_string(&path).map_err(|source| BundleError::EntryUnreadable { path, source })
}
