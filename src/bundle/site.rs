//! Assembly of the standalone document from the entry document and the catalog.

use tracing::{debug, warn};

use crate::bundle::html::{
  element_by_id, escape_attribute, escape_script_text, escape_style_text, has_element_id,
  inline_scripts, inline_styles, inner_section, strip_resource_elements, title,
};
use crate::bundle::loader::render_chunk_loader;
use crate::error::{BundleError, Result};
use crate::models::{AssemblyMode, AssetCatalog, AssetKind};
use crate::project::BundleOptions;
use crate::transform::chunks::collect_chunks;

const NOSCRIPT_NOTICE: &str =
  "    <noscript>You need to enable JavaScript to run this app.</noscript>";

/// Assembled document before post-processing.
#[derive(Debug, Clone)]
pub struct AssembledArtifact {
  /// Complete HTML document.
  pub html: String,
  /// Strategy that produced it.
  pub mode: AssemblyMode,
  /// Chunks embedded in the loader shim.
  pub chunks: usize,
}

/// Pick fragment-preserving assembly when the entry carries the framework mount marker.
pub fn detect_mode(entry_html: &str, options: &BundleOptions) -> AssemblyMode {
  if has_element_id(entry_html, &options.mount_element_id) {
    AssemblyMode::FragmentPreserving
  } else {
    AssemblyMode::Structural
  }
}

/// Merge the entry document and the catalog into one self-contained document.
pub fn assemble(
  entry_html: &str,
  catalog: &AssetCatalog,
  options: &BundleOptions,
) -> Result<AssembledArtifact> {
  match detect_mode(entry_html, options) {
    AssemblyMode::Structural => assemble_structural(entry_html, catalog, options),
    AssemblyMode::FragmentPreserving => Ok(assemble_fragment(entry_html, catalog, options)),
  }
}

fn assemble_structural(
  entry_html: &str,
  catalog: &AssetCatalog,
  options: &BundleOptions,
) -> Result<AssembledArtifact> {
  let head = inner_section(entry_html, "head")
    .ok_or(BundleError::StructureNotFound { element: "head" })?;
  let body = inner_section(entry_html, "body")
    .ok_or(BundleError::StructureNotFound { element: "body" })?;
  debug!("Assembling in structural mode");

  let page_title = title(head).unwrap_or(&options.template.default_title);
  let body_markup = strip_resource_elements(body);
  let body_section = [
    NOSCRIPT_NOTICE.to_string(),
    body_markup.trim().to_string(),
    inline_scripts(entry_html).join("\n"),
    script_block(&aggregate_scripts(catalog)),
  ]
  .join("\n");

  let html = render_document(
    options,
    page_title,
    &aggregate_styles(catalog),
    &inline_styles(entry_html).join("\n"),
    &body_section,
  );

  Ok(AssembledArtifact {
    html,
    mode: AssemblyMode::Structural,
    chunks: 0,
  })
}

fn assemble_fragment(
  entry_html: &str,
  catalog: &AssetCatalog,
  options: &BundleOptions,
) -> AssembledArtifact {
  let mount_id = &options.mount_element_id;
  debug!("Assembling in fragment-preserving mode around #{mount_id}");

  let (mount, outside) = match element_by_id(entry_html, mount_id) {
    Some(mount) => (mount.to_string(), entry_html.replacen(mount, "", 1)),
    None => {
      warn!("Mount element #{mount_id} is not balanced; emitting a placeholder");
      (
        format!(
          r#"<div id="{}">Loading...</div>"#,
          escape_attribute(mount_id)
        ),
        entry_html.to_string(),
      )
    }
  };

  let chunks = collect_chunks(catalog, options);
  let page_title = inner_section(entry_html, "head")
    .and_then(title)
    .unwrap_or(&options.template.default_title);
  let body_section = [
    NOSCRIPT_NOTICE.to_string(),
    mount,
    script_block(&render_chunk_loader(&chunks)),
    inline_scripts(&outside).join("\n"),
    script_block(&aggregate_scripts(catalog)),
  ]
  .join("\n");

  let html = render_document(
    options,
    page_title,
    &aggregate_styles(catalog),
    &inline_styles(&outside).join("\n"),
    &body_section,
  );

  AssembledArtifact {
    html,
    mode: AssemblyMode::FragmentPreserving,
    chunks: chunks.len(),
  }
}

fn aggregate_styles(catalog: &AssetCatalog) -> String {
  catalog
    .of_kind(AssetKind::Style)
    .map(|record| {
      format!(
        "/* {} */\n{}\n",
        record.relative_path(),
        escape_style_text(record.content())
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn aggregate_scripts(catalog: &AssetCatalog) -> String {
  catalog
    .of_kind(AssetKind::Script)
    .map(|record| {
      format!(
        "/* {} */\n{}\n;",
        record.relative_path(),
        escape_script_text(record.content())
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn script_block(code: &str) -> String {
  format!("    <script>\n{code}\n    </script>")
}

fn render_document(
  options: &BundleOptions,
  page_title: &str,
  styles: &str,
  entry_styles: &str,
  body: &str,
) -> String {
  let template = &options.template;
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <link rel="icon" href="{favicon}" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <meta name="description" content="{description}" />
    <title>{title}</title>
{head_extra}
    <style>
{styles}
    </style>
{entry_styles}
</head>
<body>
{body}
{body_extra}
</body>
</html>
"#,
    favicon = escape_attribute(&template.favicon),
    description = escape_attribute(&template.description),
    title = page_title,
    head_extra = template.head_extra,
    styles = styles,
    entry_styles = entry_styles,
    body = body,
    body_extra = template.body_extra,
  )
}
