//! Binary assets encoded as base64 data URIs.

use std::fs;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};

use crate::error::AssetError;

/// Wrap raw bytes as `data:<mime>;base64,<payload>`.
pub fn encode_data_uri(bytes: &[u8], mime_type: &str) -> String {
  format!(
    "data:{mime};base64,{payload}",
    mime = mime_type,
    payload = general_purpose::STANDARD.encode(bytes)
  )
}

/// Read a file and encode it as a data URI. Returns the URI and the byte count.
pub fn read_data_uri(
  source_path: &Path,
  relative_path: &str,
  mime_type: &str,
) -> Result<(String, u64), AssetError> {
  let bytes = fs::read(source_path).map_err(|source| AssetError::Read {
    relative_path: relative_path.to_string(),
    source,
  })?;
  Ok((encode_data_uri(&bytes, mime_type), bytes.len() as u64))
}
