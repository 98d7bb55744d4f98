//! Data structures produced while packaging a build directory.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::path::{Path, PathBuf};

/// How an admitted asset is encoded into the artifact.
///
/// There is no skipped kind: files left out of the catalog never become records. The reason
/// they were excluded is reported by [`crate::catalog::SkipReason`] during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
  /// Stylesheet text with `url()` references rewritten.
  Style,
  /// Script text, possibly also registered as an on-demand chunk.
  Script,
  /// Any other inlined file, stored as a data URI.
  Binary,
}

impl fmt::Display for AssetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      AssetKind::Style => "style",
      AssetKind::Script => "script",
      AssetKind::Binary => "binary",
    };
    f.write_str(label)
  }
}

/// A processed asset. Fields are read-only once the record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
  relative_path: String,
  kind: AssetKind,
  content: String,
  size: u64,
  source_path: PathBuf,
}

impl AssetRecord {
  /// Create a record for a file at `source_path`, keyed by its build-relative path.
  pub fn new(
    relative_path: impl Into<String>,
    kind: AssetKind,
    content: impl Into<String>,
    size: u64,
    source_path: impl Into<PathBuf>,
  ) -> Self {
    Self {
      relative_path: relative_path.into(),
      kind,
      content: content.into(),
      size,
      source_path: source_path.into(),
    }
  }

  /// Copy of this record carrying different content.
  pub fn with_content(&self, content: impl Into<String>) -> Self {
    Self {
      content: content.into(),
      ..self.clone()
    }
  }

  /// Forward-slash path relative to the build directory; the catalog key.
  pub fn relative_path(&self) -> &str {
    &self.relative_path
  }

  /// Encoding applied to the asset.
  pub fn kind(&self) -> AssetKind {
    self.kind
  }

  /// Text for styles and scripts, a data URI for binaries.
  pub fn content(&self) -> &str {
    &self.content
  }

  /// Size of the source file in bytes.
  pub fn size(&self) -> u64 {
    self.size
  }

  /// Absolute path of the source file.
  pub fn source_path(&self) -> &Path {
    &self.source_path
  }
}

/// Mapping of build-relative path to processed asset, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCatalog {
  records: BTreeMap<String, AssetRecord>,
}

impl AssetCatalog {
  /// Empty catalog.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a record, replacing any earlier record with the same path.
  pub fn insert(&mut self, record: AssetRecord) -> Option<AssetRecord> {
    self
      .records
      .insert(record.relative_path().to_string(), record)
  }

  /// Record stored under `relative_path`.
  pub fn get(&self, relative_path: &str) -> Option<&AssetRecord> {
    self.records.get(relative_path)
  }

  /// Whether a record is stored under `relative_path`.
  pub fn contains(&self, relative_path: &str) -> bool {
    self.records.contains_key(relative_path)
  }

  /// Number of records.
  pub fn len(&self) -> usize {
    self.records.len()
  }

  /// Whether the catalog has no records.
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Records ordered by relative path.
  pub fn iter(&self) -> btree_map::Values<'_, String, AssetRecord> {
    self.records.values()
  }

  /// Records of one kind, ordered by relative path.
  pub fn of_kind(&self, kind: AssetKind) -> impl Iterator<Item = &AssetRecord> {
    self.records.values().filter(move |record| record.kind() == kind)
  }

  /// Data URI of the binary stored under `relative_path`.
  pub fn data_uri(&self, relative_path: &str) -> Option<&str> {
    self
      .records
      .get(relative_path)
      .filter(|record| record.kind() == AssetKind::Binary)
      .map(AssetRecord::content)
  }
}

impl<'a> IntoIterator for &'a AssetCatalog {
  type Item = &'a AssetRecord;
  type IntoIter = btree_map::Values<'a, String, AssetRecord>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// On-demand script chunks indexed both by chunk id and by original request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkTable {
  paths_by_id: BTreeMap<String, String>,
  sources_by_path: BTreeMap<String, String>,
}

impl ChunkTable {
  /// Register `source` under `chunk_id` and `request_path`.
  pub fn register(
    &mut self,
    chunk_id: impl Into<String>,
    request_path: impl Into<String>,
    source: impl Into<String>,
  ) {
    let request_path = request_path.into();
    self
      .paths_by_id
      .insert(chunk_id.into(), request_path.clone());
    self.sources_by_path.insert(request_path, source.into());
  }

  /// Script text for a chunk id.
  pub fn source_for_id(&self, chunk_id: &str) -> Option<&str> {
    self
      .paths_by_id
      .get(chunk_id)
      .and_then(|path| self.sources_by_path.get(path))
      .map(String::as_str)
  }

  /// Script text for an original request path such as `/_next/static/chunks/42-ab.js`.
  pub fn source_for_path(&self, request_path: &str) -> Option<&str> {
    self.sources_by_path.get(request_path).map(String::as_str)
  }

  /// Chunk id → request path index.
  pub fn paths_by_id(&self) -> &BTreeMap<String, String> {
    &self.paths_by_id
  }

  /// Request path → script text index.
  pub fn sources_by_path(&self) -> &BTreeMap<String, String> {
    &self.sources_by_path
  }

  /// Number of registered chunks.
  pub fn len(&self) -> usize {
    self.paths_by_id.len()
  }

  /// Whether no chunk is registered.
  pub fn is_empty(&self) -> bool {
    self.paths_by_id.is_empty()
  }
}

/// Strategy used to assemble the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyMode {
  /// Rebuilt from the entry's `<head>` and `<body>` fragments.
  Structural,
  /// Framework mount element preserved verbatim, with the chunk-loader shim.
  FragmentPreserving,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct BuildSummary {
  /// Where the artifact was written.
  pub output_file: PathBuf,
  /// Artifact size in bytes.
  pub output_size: u64,
  /// Assets inlined into the artifact.
  pub inlined: usize,
  /// Files left out (skip list, size cap, unsupported type, hook veto).
  pub skipped: usize,
  /// Chunks embedded in the loader shim.
  pub chunks: usize,
  /// Assembly strategy that was used.
  pub mode: AssemblyMode,
  /// Non-fatal per-asset failures.
  pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(path: &str, kind: AssetKind, content: &str) -> AssetRecord {
    AssetRecord::new(path, kind, content, content.len() as u64, format!("/build/{path}"))
  }

  #[test]
  fn reinserting_a_path_overwrites_the_record() {
    let mut catalog = AssetCatalog::new();
    catalog.insert(record("a.css", AssetKind::Style, "old"));
    let previous = catalog.insert(record("a.css", AssetKind::Style, "new"));

    assert_eq!(previous.unwrap().content(), "old");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("a.css").unwrap().content(), "new");
  }

  #[test]
  fn data_uri_only_resolves_binaries() {
    let mut catalog = AssetCatalog::new();
    catalog.insert(record("img/a.png", AssetKind::Binary, "data:image/png;base64,AA=="));
    catalog.insert(record("a.css", AssetKind::Style, "body{}"));

    assert_eq!(catalog.data_uri("img/a.png"), Some("data:image/png;base64,AA=="));
    assert_eq!(catalog.data_uri("a.css"), None);
    assert_eq!(catalog.of_kind(AssetKind::Style).count(), 1);
  }

  #[test]
  fn chunk_table_supports_dual_lookup() {
    let mut table = ChunkTable::default();
    table.register("42", "/_next/static/chunks/42-abcd.js", "chunk()");

    assert_eq!(table.source_for_id("42"), Some("chunk()"));
    assert_eq!(
      table.source_for_path("/_next/static/chunks/42-abcd.js"),
      Some("chunk()")
    );
    assert_eq!(table.source_for_id("7"), None);
    assert_eq!(table.len(), 1);
  }
}
