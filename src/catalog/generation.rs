//! Two-phase catalog construction: discover everything, then cross-reference.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::catalog::scanning::{PendingAsset, ScanOutcome, discover_assets};
use crate::error::AssetError;
use crate::hooks::BundleHooks;
use crate::models::{AssetCatalog, AssetKind, AssetRecord};
use crate::project::{BundleOptions, extension_of};
use crate::transform::binary::read_data_uri;
use crate::transform::read_text;
use crate::transform::styles::rewrite_style_urls;

/// Catalog produced for one run together with its counters.
#[derive(Debug, Default)]
pub struct CatalogOutcome {
  /// Processed assets keyed by relative path.
  pub catalog: AssetCatalog,
  /// Files left out of the catalog.
  pub skipped: usize,
  /// Per-asset failures; the affected assets are absent from the catalog.
  pub errors: Vec<AssetError>,
}

/// Walk `options.build_dir` and produce the asset catalog.
///
/// Stylesheets are only linked against binaries once every file has been discovered and
/// encoded, so a stylesheet can reference an image that the walk reaches later.
pub fn build_catalog<H: BundleHooks>(options: &BundleOptions, hooks: &H) -> CatalogOutcome {
  let ScanOutcome {
    pending,
    skipped,
    mut errors,
  } = discover_assets(options, hooks);

  let mut loaded = Vec::with_capacity(pending.len());
  for asset in &pending {
    match load_asset(asset, options) {
      Ok(record) => loaded.push(record),
      Err(err) => {
        warn!("{err}");
        errors.push(err);
      }
    }
  }

  let (styles, others): (Vec<_>, Vec<_>) = loaded
    .into_iter()
    .partition(|record| record.kind() == AssetKind::Style);

  let mut catalog = AssetCatalog::new();
  for record in others {
    catalog_record(&mut catalog, hooks.after_asset(record));
  }
  for record in link_styles(styles, &catalog) {
    catalog_record(&mut catalog, hooks.after_asset(record));
  }

  CatalogOutcome {
    catalog,
    skipped,
    errors,
  }
}

/// Rewrite every stylesheet's `url()` references against the binaries in `catalog`.
///
/// The result depends only on the set of records, never on their order.
pub fn link_styles(styles: Vec<AssetRecord>, catalog: &AssetCatalog) -> Vec<AssetRecord> {
  let binaries: BTreeMap<&str, &str> = catalog
    .of_kind(AssetKind::Binary)
    .map(|record| (record.relative_path(), record.content()))
    .collect();

  styles
    .into_iter()
    .map(|record| {
      let rewritten = rewrite_style_urls(record.content(), record.relative_path(), |key| {
        binaries.get(key).copied()
      });
      for reference in &rewritten.unresolved {
        debug!(
          "Unresolved reference '{reference}' in {}",
          record.relative_path()
        );
      }
      record.with_content(rewritten.content)
    })
    .collect()
}

fn load_asset(asset: &PendingAsset, options: &BundleOptions) -> Result<AssetRecord, AssetError> {
  let PendingAsset {
    relative_path,
    source_path,
    kind,
    ..
  } = asset;

  match kind {
    AssetKind::Binary => {
      let extension = extension_of(source_path).unwrap_or_default();
      let (data_uri, size) =
        read_data_uri(source_path, relative_path, options.mime_types.mime_for(&extension))?;
      Ok(AssetRecord::new(
        relative_path.as_str(),
        *kind,
        data_uri,
        size,
        source_path.as_path(),
      ))
    }
    AssetKind::Style | AssetKind::Script => {
      let text = read_text(source_path, relative_path)?;
      let size = text.len() as u64;
      Ok(AssetRecord::new(
        relative_path.as_str(),
        *kind,
        text,
        size,
        source_path.as_path(),
      ))
    }
  }
}

fn catalog_record(catalog: &mut AssetCatalog, record: AssetRecord) {
  info!("Processed {}: {}", record.kind(), record.relative_path());
  catalog.insert(record);
}
