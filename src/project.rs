//! Immutable options describing one bundling run.
//!
//! Every classification table the pipeline consults lives on [`BundleOptions`], which is built
//! once (usually from [`crate::config::BundleConfig`]) and then only borrowed. Two runs with
//! different options never observe each other's tables.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Default directory holding the static export.
pub const DEFAULT_BUILD_DIR: &str = "./out";
/// Default artifact path, shared by the bundler and the validator.
pub const DEFAULT_OUTPUT_FILE: &str = "./standalone.html";
/// Files larger than this many bytes are left out of the artifact by default.
pub const DEFAULT_MAX_ASSET_SIZE: u64 = 1024 * 1024;
/// Id of the element a server-rendering framework hydrates into.
pub const DEFAULT_MOUNT_ELEMENT_ID: &str = "__next";

const DEFAULT_SKIP_EXTENSIONS: &[&str] = &["map", "txt", "md", "log", "json", "xml"];
const DEFAULT_INLINE_EXTENSIONS: &[&str] = &[
  "css", "js", "png", "jpg", "jpeg", "gif", "svg", "ico", "woff", "woff2", "ttf", "eot",
];
const DEFAULT_STYLE_EXTENSIONS: &[&str] = &["css"];
const DEFAULT_SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs"];
const DEFAULT_ENTRY_CANDIDATES: &[&str] = &[
  "index.html",
  "Index.html",
  "INDEX.HTML",
  "demo/index.html",
  "dependency-graph/index.html",
];
const DEFAULT_CHUNK_PATH_MARKERS: &[&str] = &["_next/static/chunks/"];

const BUILTIN_MIME_TYPES: &[(&str, &str)] = &[
  ("css", "text/css"),
  ("js", "application/javascript"),
  ("mjs", "application/javascript"),
  ("png", "image/png"),
  ("jpg", "image/jpeg"),
  ("jpeg", "image/jpeg"),
  ("gif", "image/gif"),
  ("svg", "image/svg+xml"),
  ("ico", "image/x-icon"),
  ("woff", "font/woff"),
  ("woff2", "font/woff2"),
  ("ttf", "font/ttf"),
  ("eot", "application/vnd.ms-fontobject"),
];

/// Fallback MIME type for extensions missing from the table.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Percent-encoded atom glyph used when no favicon is configured.
pub const DEFAULT_FAVICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'%3E%3Ctext y='.9em' font-size='90'%3E%E2%9A%9B%EF%B8%8F%3C/text%3E%3C/svg%3E";

/// Normalise an extension to lowercase without its leading dot (`".PNG"` → `"png"`).
pub fn normalise_extension(value: &str) -> String {
  value.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Lowercased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(normalise_extension)
}

/// Extension → MIME table: the built-in entries overlaid with configured overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeTable {
  entries: BTreeMap<String, String>,
}

impl Default for MimeTable {
  fn default() -> Self {
    Self {
      entries: BUILTIN_MIME_TYPES
        .iter()
        .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
        .collect(),
    }
  }
}

impl MimeTable {
  /// Built-in table with `overrides` applied on top. Keys may carry a leading dot.
  pub fn with_overrides<I, K, V>(overrides: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
  {
    let mut table = Self::default();
    for (ext, mime) in overrides {
      table
        .entries
        .insert(normalise_extension(ext.as_ref()), mime.into());
    }
    table
  }

  /// MIME type for a normalised extension, falling back to `application/octet-stream`.
  pub fn mime_for(&self, extension: &str) -> &str {
    self
      .entries
      .get(extension)
      .map(String::as_str)
      .unwrap_or(FALLBACK_MIME_TYPE)
  }
}

/// Markup knobs applied to the generated document shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTemplate {
  /// Raw markup appended inside `<head>`.
  pub head_extra: String,
  /// Raw markup appended at the end of `<body>`.
  pub body_extra: String,
  /// Favicon href, normally a data URI.
  pub favicon: String,
  /// Title used when the entry document has none.
  pub default_title: String,
  /// Content of the description meta tag.
  pub description: String,
}

impl Default for HtmlTemplate {
  fn default() -> Self {
    Self {
      head_extra: String::new(),
      body_extra: String::new(),
      favicon: DEFAULT_FAVICON.to_string(),
      default_title: "Standalone App".to_string(),
      description: "Standalone single-file build".to_string(),
    }
  }
}

/// Options value threaded through every stage of a run.
#[derive(Debug, Clone)]
pub struct BundleOptions {
  /// Directory holding the static export.
  pub build_dir: PathBuf,
  /// Artifact destination.
  pub output_file: PathBuf,
  /// Files larger than this many bytes are skipped.
  pub max_asset_size: u64,
  /// Extensions that are never cataloged.
  pub skip_extensions: BTreeSet<String>,
  /// Extensions inlined as data URIs when not a style or script.
  pub inline_extensions: BTreeSet<String>,
  /// Extensions routed to the style transform.
  pub style_extensions: BTreeSet<String>,
  /// Extensions routed to the script transform.
  pub script_extensions: BTreeSet<String>,
  /// Extension → MIME table for binary assets.
  pub mime_types: MimeTable,
  /// Relative paths probed, in order, for the entry document.
  pub entry_candidates: Vec<String>,
  /// Path fragments identifying directories of on-demand chunks.
  pub chunk_path_markers: Vec<String>,
  /// Id of the framework mount element that selects fragment-preserving assembly.
  pub mount_element_id: String,
  /// Document shell customisation.
  pub template: HtmlTemplate,
}

impl Default for BundleOptions {
  fn default() -> Self {
    Self {
      build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
      output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
      max_asset_size: DEFAULT_MAX_ASSET_SIZE,
      skip_extensions: extension_set(DEFAULT_SKIP_EXTENSIONS),
      inline_extensions: extension_set(DEFAULT_INLINE_EXTENSIONS),
      style_extensions: extension_set(DEFAULT_STYLE_EXTENSIONS),
      script_extensions: extension_set(DEFAULT_SCRIPT_EXTENSIONS),
      mime_types: MimeTable::default(),
      entry_candidates: DEFAULT_ENTRY_CANDIDATES
        .iter()
        .map(|value| value.to_string())
        .collect(),
      chunk_path_markers: DEFAULT_CHUNK_PATH_MARKERS
        .iter()
        .map(|value| value.to_string())
        .collect(),
      mount_element_id: DEFAULT_MOUNT_ELEMENT_ID.to_string(),
      template: HtmlTemplate::default(),
    }
  }
}

impl BundleOptions {
  /// Default options reading from `build_dir` and writing to `output_file`.
  pub fn new(build_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
    Self {
      build_dir: build_dir.into(),
      output_file: output_file.into(),
      ..Self::default()
    }
  }

  /// Replace the size cap.
  pub fn with_max_asset_size(mut self, max_asset_size: u64) -> Self {
    self.max_asset_size = max_asset_size;
    self
  }

  /// Whether `relative_path` names one of the entry document candidates.
  pub fn is_entry_candidate(&self, relative_path: &str) -> bool {
    self
      .entry_candidates
      .iter()
      .any(|candidate| candidate.trim_start_matches("./") == relative_path)
  }

  /// Whether `relative_path` lives under a chunk-bearing directory.
  pub fn is_chunk_path(&self, relative_path: &str) -> bool {
    self
      .chunk_path_markers
      .iter()
      .any(|marker| relative_path.contains(marker.trim_start_matches('/')))
  }
}

/// Normalised set built from a list of extensions.
pub fn extension_set<I, S>(values: I) -> BTreeSet<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  values
    .into_iter()
    .map(|value| normalise_extension(value.as_ref()))
    .filter(|value| !value.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalises_extensions_with_dots_and_case() {
    assert_eq!(normalise_extension(".PNG"), "png");
    assert_eq!(normalise_extension("woff2"), "woff2");
    assert_eq!(extension_of(Path::new("a/b/Font.WOFF2")).as_deref(), Some("woff2"));
    assert_eq!(extension_of(Path::new("LICENSE")), None);
  }

  #[test]
  fn mime_overrides_replace_and_extend_builtin_table() {
    let table = MimeTable::with_overrides([(".webp", "image/webp"), ("png", "image/x-png")]);
    assert_eq!(table.mime_for("webp"), "image/webp");
    assert_eq!(table.mime_for("png"), "image/x-png");
    assert_eq!(table.mime_for("gif"), "image/gif");
    assert_eq!(table.mime_for("bin"), FALLBACK_MIME_TYPE);
  }

  #[test]
  fn recognises_entry_candidates_and_chunk_paths() {
    let options = BundleOptions::default();
    assert!(options.is_entry_candidate("index.html"));
    assert!(options.is_entry_candidate("demo/index.html"));
    assert!(!options.is_entry_candidate("about/index.html"));
    assert!(options.is_chunk_path("_next/static/chunks/42-abc.js"));
    assert!(!options.is_chunk_path("static/js/main.js"));
  }
}
