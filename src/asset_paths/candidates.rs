/// Resolve a stylesheet reference to the catalog key it points at.
///
/// Relative references are resolved against the directory of the referencing stylesheet and
/// root-relative ones (leading `/`) against the build directory. Query strings and fragments
/// (`font.woff2?v=3#iefix`) are dropped. `None` means the reference climbs above the build
/// directory and cannot name a cataloged file.
pub fn resolve_style_reference(style_key: &str, reference: &str) -> Option<String> {
    let path = reference
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .replace('\\', "/");
    if path.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    if !path.starts_with('/') {
        segments.extend(style_key.split('/').filter(|segment| !segment.is_empty()));
        segments.pop();
    }

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
