//! Extension points around asset processing and artifact writing.

use std::path::Path;

use crate::models::AssetRecord;

/// Callbacks invoked by [`crate::StandaloneBuilder`] during a run.
///
/// Every method has a pass-through default, so implementors only override the stages they
/// care about. `()` implements the trait with no behaviour.
pub trait BundleHooks {
  /// Called for every admitted file before it is read. Returning `false` skips the file and
  /// counts it as skipped.
  fn before_asset(&self, _relative_path: &str, _source_path: &Path) -> bool {
    true
  }

  /// Called with each fully transformed record before it enters the catalog.
  fn after_asset(&self, record: AssetRecord) -> AssetRecord {
    record
  }

  /// Called with the post-processed artifact right before it is written.
  fn before_write(&self, html: String) -> String {
    html
  }
}

impl BundleHooks for () {}
