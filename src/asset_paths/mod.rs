//! Helpers for turning filesystem paths and stylesheet references into catalog keys.
//!
//! Filtering references, building keys and resolving relative references are split into
//! focused submodules so each can be tested on its own.

mod bundle;
mod candidates;
mod filters;

pub use bundle::{make_catalog_key, request_path};
pub use candidates::resolve_style_reference;
pub use filters::should_ignore_asset_reference;
