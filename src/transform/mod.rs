//! Per-asset encoders: stylesheet rewriting, binary data URIs and chunk registration.

pub mod binary;
pub mod chunks;
pub mod styles;

use std::fs;
use std::path::Path;

use crate::error::AssetError;

/// Read a style or script file as UTF-8 text.
pub fn read_text(source_path: &Path, relative_path: &str) -> Result<String, AssetError> {
  let bytes = fs::read(source_path).map_err(|source| AssetError::Read {
    relative_path: relative_path.to_string(),
    source,
  })?;
  String::from_utf8(bytes).map_err(|_| AssetError::InvalidUtf8 {
    relative_path: relative_path.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn rejects_non_utf8_text_assets() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.css");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    let err = read_text(&path, "broken.css").unwrap_err();
    assert!(matches!(err, AssetError::InvalidUtf8 { .. }));
  }

  #[test]
  fn reports_missing_files_as_read_errors() {
    let dir = tempdir().unwrap();
    let err = read_text(&dir.path().join("gone.js"), "gone.js").unwrap_err();
    assert!(err.to_string().contains("gone.js"));
  }
}
