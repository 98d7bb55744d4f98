//! JSON configuration loader describing a bundling run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BundleError, Result};
use crate::project::{
    BundleOptions, DEFAULT_BUILD_DIR, DEFAULT_FAVICON, DEFAULT_MAX_ASSET_SIZE,
    DEFAULT_MOUNT_ELEMENT_ID, DEFAULT_OUTPUT_FILE, HtmlTemplate, MimeTable, extension_set,
};

/// File name looked up by [`BundleConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "standalone.config.json";

/// Discoverable configuration mirroring [`BundleOptions`] with serialisable fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleConfig {
    /// Directory holding the static export.
    pub build_dir: String,
    /// Artifact destination.
    pub output_file: String,
    /// Size cap in bytes.
    pub max_asset_size: u64,
    /// Extensions never cataloged (leading dots allowed).
    pub skip_extensions: Vec<String>,
    /// Extensions inlined as data URIs.
    pub inline_extensions: Vec<String>,
    /// Extensions handled by the style transform.
    pub style_extensions: Vec<String>,
    /// Extensions handled by the script transform.
    pub script_extensions: Vec<String>,
    /// Extra or replacement extension → MIME entries.
    pub mime_types: BTreeMap<String, String>,
    /// Entry document candidates, probed in order.
    pub entry_candidates: Vec<String>,
    /// Path fragments identifying chunk directories.
    pub chunk_path_markers: Vec<String>,
    /// Id of the framework mount element.
    pub mount_element_id: String,
    /// Document shell customisation.
    pub html_template: HtmlTemplateConfig,
}

/// Serialisable form of [`HtmlTemplate`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlTemplateConfig {
    /// Raw markup appended inside `<head>`.
    pub head_extra: String,
    /// Raw markup appended at the end of `<body>`.
    pub body_extra: String,
    /// Favicon href.
    pub favicon: String,
    /// Title used when the entry document has none.
    pub default_title: String,
    /// Description meta content.
    pub description: String,
}

impl Default for HtmlTemplateConfig {
    fn default() -> Self {
        let template = HtmlTemplate::default();
        Self {
            head_extra: template.head_extra,
            body_extra: template.body_extra,
            favicon: DEFAULT_FAVICON.to_string(),
            default_title: template.default_title,
            description: template.description,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        let options = BundleOptions::default();
        Self {
            build_dir: DEFAULT_BUILD_DIR.into(),
            output_file: DEFAULT_OUTPUT_FILE.into(),
            max_asset_size: DEFAULT_MAX_ASSET_SIZE,
            skip_extensions: options.skip_extensions.into_iter().collect(),
            inline_extensions: options.inline_extensions.into_iter().collect(),
            style_extensions: options.style_extensions.into_iter().collect(),
            script_extensions: options.script_extensions.into_iter().collect(),
            mime_types: BTreeMap::new(),
            entry_candidates: options.entry_candidates,
            chunk_path_markers: options.chunk_path_markers,
            mount_element_id: DEFAULT_MOUNT_ELEMENT_ID.into(),
            html_template: HtmlTemplateConfig::default(),
        }
    }
}

impl BundleConfig {
    /// Load `standalone.config.json` from `dir`, falling back to defaults when it is absent.
    ///
    /// A file that exists but fails to parse is still an error, so a typo never silently
    /// reverts a run to default settings.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.is_file() {
            return Ok(Self::default());
        }
        Self::load(&candidate)
    }

    /// Read configuration from a specific JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| BundleError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| BundleError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Convert the configuration into the immutable options value used by the pipeline.
    pub fn into_options(self) -> BundleOptions {
        BundleOptions {
            build_dir: PathBuf::from(self.build_dir),
            output_file: PathBuf::from(self.output_file),
            max_asset_size: self.max_asset_size,
            skip_extensions: extension_set(self.skip_extensions),
            inline_extensions: extension_set(self.inline_extensions),
            style_extensions: extension_set(self.style_extensions),
            script_extensions: extension_set(self.script_extensions),
            mime_types: MimeTable::with_overrides(self.mime_types),
            entry_candidates: self.entry_candidates,
            chunk_path_markers: self.chunk_path_markers,
            mount_element_id: self.mount_element_id,
            template: HtmlTemplate {
                head_extra: self.html_template.head_extra,
                body_extra: self.html_template.body_extra,
                favicon: self.html_template.favicon,
                default_title: self.html_template.default_title,
                description: self.html_template.description,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_falls_back_to_defaults_without_file() {
        let dir = tempdir().unwrap();
        let options = BundleConfig::discover(dir.path()).unwrap().into_options();
        assert_eq!(options.build_dir, PathBuf::from(DEFAULT_BUILD_DIR));
        assert_eq!(options.max_asset_size, DEFAULT_MAX_ASSET_SIZE);
        assert!(options.skip_extensions.contains("map"));
    }

    #[test]
    fn loads_camel_case_keys_and_normalises_extensions() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{
              "buildDir": "./dist",
              "maxAssetSize": 2048,
              "skipExtensions": [".MAP", ".txt"],
              "mimeTypes": { ".webp": "image/webp" },
              "htmlTemplate": { "defaultTitle": "Dashboard" }
            }"#,
        )
        .unwrap();

        let options = BundleConfig::discover(dir.path()).unwrap().into_options();
        assert_eq!(options.build_dir, PathBuf::from("./dist"));
        assert_eq!(options.output_file, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(options.max_asset_size, 2048);
        assert_eq!(
            options.skip_extensions.iter().collect::<Vec<_>>(),
            vec!["map", "txt"]
        );
        assert_eq!(options.mime_types.mime_for("webp"), "image/webp");
        assert_eq!(options.template.default_title, "Dashboard");
        assert_eq!(options.template.favicon, DEFAULT_FAVICON);
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = BundleConfig::load(&path).unwrap_err();
        assert!(matches!(err, BundleError::ConfigParse { .. }));
    }
}
