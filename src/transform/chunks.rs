//! Registration of on-demand script chunks for the runtime loader shim.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::asset_paths::request_path;
use crate::models::{AssetCatalog, AssetKind, ChunkTable};
use crate::project::BundleOptions;

fn chunk_id_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^(\d+)-").expect("invalid chunk id regex"))
}

/// Parse the chunk id encoded as a leading `<digits>-` prefix of a file name.
pub fn parse_chunk_id(file_name: &str) -> Option<&str> {
  chunk_id_pattern()
    .captures(file_name)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Collect every cataloged script under a chunk-bearing path whose file name carries an id.
pub fn collect_chunks(catalog: &AssetCatalog, options: &BundleOptions) -> ChunkTable {
  let mut table = ChunkTable::default();

  for record in catalog.of_kind(AssetKind::Script) {
    let key = record.relative_path();
    if !options.is_chunk_path(key) {
      continue;
    }
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let Some(chunk_id) = parse_chunk_id(file_name) else {
      continue;
    };

    debug!("Registered chunk {chunk_id}: {key}");
    table.register(chunk_id, request_path(key), record.content());
  }

  table
}
