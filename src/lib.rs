#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod catalog;
pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod project;
pub mod transform;
pub mod validate;

pub use builder::StandaloneBuilder;
pub use config::BundleConfig;
pub use error::{AssetError, BundleError};
pub use hooks::BundleHooks;
pub use models::{AssemblyMode, AssetCatalog, AssetKind, AssetRecord, BuildSummary, ChunkTable};
pub use project::{BundleOptions, HtmlTemplate, MimeTable};
pub use validate::{Finding, Severity, ValidationReport, Validator};
