use std::path::{Component, Path};

/// Produce the catalog key for a file below the build directory.
///
/// The key always uses forward slashes so that catalogs built on every platform agree, no
/// matter which native separator the walk reported.
pub fn make_catalog_key(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Path a browser would request for the cataloged file when served from the build root.
pub fn request_path(catalog_key: &str) -> String {
    format!("/{}", catalog_key.trim_start_matches('/'))
}
