//! Assembly of the single-file artifact from an entry document and an asset catalog.

pub mod entry;
pub mod html;
pub mod loader;
pub mod postprocess;
pub mod site;
