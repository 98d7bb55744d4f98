//! Build orchestrator that turns a build directory into one standalone HTML file.

use std::fs;

use tracing::{error, info, warn};

use crate::bundle::entry::read_entry;
use crate::bundle::postprocess::strip_external_references;
use crate::bundle::site::{AssembledArtifact, assemble};
use crate::catalog::{CatalogOutcome, build_catalog};
use crate::error::{BundleError, Result};
use crate::hooks::BundleHooks;
use crate::models::BuildSummary;
use crate::project::BundleOptions;

/// High-level helper running the catalog, assembly and post-processing stages in order.
pub struct StandaloneBuilder {
  options: BundleOptions,
}

impl StandaloneBuilder {
  /// Create a builder for the provided options.
  pub fn new(options: BundleOptions) -> Self {
    Self { options }
  }

  /// Options this builder runs with.
  pub fn options(&self) -> &BundleOptions {
    &self.options
  }

  /// Run the pipeline without hooks.
  pub fn build(&self) -> Result<BuildSummary> {
    self.build_with_hooks(&())
  }

  /// Run the pipeline, calling `hooks` at each extension point, and write the artifact.
  ///
  /// Per-asset failures are collected into the summary. Any error returned from here means
  /// no artifact was written.
  pub fn build_with_hooks<H: BundleHooks>(&self, hooks: &H) -> Result<BuildSummary> {
    let options = &self.options;
    if !options.build_dir.is_dir() {
      return Err(BundleError::BuildDirNotFound {
        path: options.build_dir.clone(),
      });
    }
    info!("Building standalone HTML from {}", options.build_dir.display());

    let entry_html = read_entry(options)?;
    let CatalogOutcome {
      catalog,
      skipped,
      errors,
    } = build_catalog(options, hooks);

    let AssembledArtifact { html, mode, chunks } = assemble(&entry_html, &catalog, options)?;
    let html = hooks.before_write(strip_external_references(&html));

    let output_file = &options.output_file;
    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(|source| BundleError::Write {
        path: output_file.clone(),
        source,
      })?;
    }
    fs::write(output_file, &html).map_err(|source| BundleError::Write {
      path: output_file.clone(),
      source,
    })?;

    let summary = BuildSummary {
      output_file: output_file.clone(),
      output_size: html.len() as u64,
      inlined: catalog.len(),
      skipped,
      chunks,
      mode,
      errors: errors.iter().map(ToString::to_string).collect(),
    };
    log_summary(&summary);
    Ok(summary)
  }
}

fn log_summary(summary: &BuildSummary) {
  info!("Standalone HTML created: {}", summary.output_file.display());
  info!(
    "File size: {:.2}MB",
    summary.output_size as f64 / 1024.0 / 1024.0
  );
  info!(
    "Summary: {} files inlined, {} skipped, {} errors",
    summary.inlined,
    summary.skipped,
    summary.errors.len()
  );
  if summary.chunks > 0 {
    info!("Embedded {} chunks in the runtime loader", summary.chunks);
  }
  if !summary.errors.is_empty() {
    warn!("Errors encountered:");
    for message in &summary.errors {
      error!("  {message}");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  use base64::Engine;
  use base64::engine::general_purpose::STANDARD;
  use tempfile::{TempDir, tempdir};

  use crate::models::{AssemblyMode, AssetRecord};
  use crate::validate::Validator;

  const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2];

  fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
  }

  fn spa_build() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path().join("out");
    write(
      &root,
      "index.html",
      br#"<!DOCTYPE html><html><head><title>Dashboard</title>
<link rel="stylesheet" href="/static/css/main.css"></head>
<body><div id="root"></div><script src="/static/js/main.js"></script></body></html>"#,
    );
    write(
      &root,
      "static/css/main.css",
      b".logo{background:url(../../img/a.png)}",
    );
    write(&root, "static/js/main.js", b"document.getElementById('root').textContent='hi';");
    write(&root, "img/a.png", PNG_BYTES);
    write(&root, "static/js/main.js.map", b"{}");
    dir
  }

  fn options_for(dir: &TempDir) -> BundleOptions {
    BundleOptions::new(dir.path().join("out"), dir.path().join("dist/standalone.html"))
  }

  #[test]
  fn builds_a_self_contained_spa_artifact() {
    let dir = spa_build();
    let summary = StandaloneBuilder::new(options_for(&dir)).build().unwrap();

    assert_eq!(summary.mode, AssemblyMode::Structural);
    assert_eq!(summary.inlined, 3);
    assert_eq!(summary.skipped, 1);
    assert!(summary.errors.is_empty());

    let html = fs::read_to_string(&summary.output_file).unwrap();
    assert_eq!(summary.output_size, html.len() as u64);
    let expected = format!("url(\"data:image/png;base64,{}\")", STANDARD.encode(PNG_BYTES));
    assert!(html.contains(&expected));
    assert!(!html.contains("img/a.png)"));
    assert!(!html.contains("src=\"/static/js/main.js\""));

    let report = Validator::new().validate_str(&html);
    assert!(report.passed(), "{}", report.render());
  }

  #[test]
  fn embeds_chunks_for_framework_builds() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("out");
    write(
      &root,
      "index.html",
      br#"<!DOCTYPE html><html><head><title>Next</title>
<script src="/_next/static/chunks/webpack-1.js" defer></script></head>
<body><div id="__next"><div><p>server rendered</p></div></div></body></html>"#,
    );
    write(&root, "_next/static/chunks/42-abcd1234.js", b"self.loaded42=true;");
    write(&root, "_next/static/chunks/webpack-1.js", b"self.webpack=true;");

    let summary = StandaloneBuilder::new(options_for(&dir)).build().unwrap();
    assert_eq!(summary.mode, AssemblyMode::FragmentPreserving);
    assert_eq!(summary.chunks, 1);

    let html = fs::read_to_string(&summary.output_file).unwrap();
    assert!(html.contains(r#""42":"/_next/static/chunks/42-abcd1234.js""#));
    assert!(html.contains(r#"<div id="__next"><div><p>server rendered</p></div></div>"#));
    assert!(!html.contains(r#"src="/_next/static/chunks/webpack-1.js""#));
    assert!(Validator::new().validate_str(&html).passed());
  }

  #[test]
  fn oversized_files_are_skipped() {
    let dir = spa_build();
    write(&dir.path().join("out"), "img/huge.png", &vec![7u8; 4096]);

    let options = options_for(&dir).with_max_asset_size(1024);
    let summary = StandaloneBuilder::new(options).build().unwrap();

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.inlined, 3);
    let html = fs::read_to_string(&summary.output_file).unwrap();
    assert!(!html.contains("img/huge.png"));
  }

  #[test]
  fn missing_entry_aborts_without_output() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("out"), "static/app.js", b"app()");
    let options = options_for(&dir);
    let output = options.output_file.clone();

    let err = StandaloneBuilder::new(options).build().unwrap_err();
    assert!(matches!(err, BundleError::EntryNotFound { .. }));
    assert!(!output.exists());
  }

  #[test]
  fn missing_build_dir_aborts() {
    let dir = tempdir().unwrap();
    let err = StandaloneBuilder::new(options_for(&dir)).build().unwrap_err();
    assert!(matches!(err, BundleError::BuildDirNotFound { .. }));
  }

  #[test]
  fn missing_head_is_fatal_in_structural_mode() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("out"), "index.html", b"<html><body>x</body></html>");
    let options = options_for(&dir);
    let output = options.output_file.clone();

    let err = StandaloneBuilder::new(options).build().unwrap_err();
    assert!(matches!(err, BundleError::StructureNotFound { .. }));
    assert!(!output.exists());
  }

  struct Stamp;

  impl BundleHooks for Stamp {
    fn before_asset(&self, relative_path: &str, _source_path: &Path) -> bool {
      !relative_path.ends_with(".png")
    }

    fn after_asset(&self, record: AssetRecord) -> AssetRecord {
      let content = format!("/* stamped */{}", record.content());
      record.with_content(content)
    }

    fn before_write(&self, html: String) -> String {
      html.replace("<body>", "<body data-stamped=\"yes\">")
    }
  }

  #[test]
  fn hooks_run_at_every_stage() {
    let dir = spa_build();
    let summary = StandaloneBuilder::new(options_for(&dir))
      .build_with_hooks(&Stamp)
      .unwrap();

    assert_eq!(summary.inlined, 2);
    assert_eq!(summary.skipped, 2);
    let html = fs::read_to_string(&summary.output_file).unwrap();
    assert!(html.contains("<body data-stamped=\"yes\">"));
    assert!(html.contains("/* stamped */document.getElementById"));
    assert!(html.contains("url(../../img/a.png)"));
  }
}
