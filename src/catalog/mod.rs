//! Asset catalog construction split into discovery and linking stages.

mod generation;
mod scanning;

pub use generation::{CatalogOutcome, build_catalog, link_styles};
pub use scanning::{Admission, PendingAsset, ScanOutcome, SkipReason, classify, discover_assets};
