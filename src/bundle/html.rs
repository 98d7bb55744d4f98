//! Tag-bounded extraction helpers for entry documents.
//!
//! These are deliberately pattern based: entry documents come from static exporters whose
//! output is regular enough that matching on tag boundaries is reliable, and the artifact
//! must reproduce extracted fragments byte for byte.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

macro_rules! cached_regex {
  ($name:ident, $pattern:expr) => {
    fn $name() -> &'static Regex {
      static PATTERN: OnceLock<Regex> = OnceLock::new();
      PATTERN.get_or_init(|| Regex::new($pattern).expect(concat!("invalid ", stringify!($name))))
    }
  };
}

cached_regex!(head_pattern, r"(?is)<head(?:\s[^>]*)?>(.*?)</head\s*>");
cached_regex!(body_pattern, r"(?is)<body(?:\s[^>]*)?>(.*)</body\s*>");
cached_regex!(title_pattern, r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>");
cached_regex!(style_element_pattern, r"(?is)<style(?:\s[^>]*)?>.*?</style\s*>");
cached_regex!(script_element_pattern, r"(?is)<script(?:\s([^>]*))?>.*?</script\s*>");
cached_regex!(src_attribute_pattern, r"(?i)(?:^|\s)src\s*=");
cached_regex!(link_tag_pattern, r"(?i)<link\b[^>]*>");
cached_regex!(any_tag_pattern, r"(?i)<(/?)([a-z][a-z0-9-]*)\b[^>]*>");
cached_regex!(id_attribute_pattern, r#"(?i)\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#);
cached_regex!(
  id_element_pattern,
  r#"(?i)<([a-z][a-z0-9-]*)\b[^>]*?\sid\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>"#
);
cached_regex!(script_close_pattern, r"(?i)</(script)");
cached_regex!(style_close_pattern, r"(?i)</(style)");

/// Inner markup of the `<head>` or `<body>` element.
pub fn inner_section<'a>(document: &'a str, tag: &str) -> Option<&'a str> {
  let pattern = match tag {
    "head" => head_pattern(),
    "body" => body_pattern(),
    _ => return None,
  };
  pattern
    .captures(document)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Trimmed, non-empty `<title>` text.
pub fn title(document: &str) -> Option<&str> {
  title_pattern()
    .captures(document)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim())
    .filter(|title| !title.is_empty())
}

/// Every `<style>` element, verbatim.
pub fn inline_styles(document: &str) -> Vec<&str> {
  style_element_pattern()
    .find_iter(document)
    .map(|m| m.as_str())
    .collect()
}

/// Every `<script>` element without a `src` attribute, verbatim.
pub fn inline_scripts(document: &str) -> Vec<&str> {
  script_element_pattern()
    .captures_iter(document)
    .filter(|caps| {
      caps
        .get(1)
        .is_none_or(|attrs| !src_attribute_pattern().is_match(attrs.as_str()))
    })
    .filter_map(|caps| caps.get(0))
    .map(|m| m.as_str())
    .collect()
}

/// Remove script, style and link elements from a markup fragment.
pub fn strip_resource_elements(fragment: &str) -> String {
  let without_scripts = script_element_pattern().replace_all(fragment, "");
  let without_styles = style_element_pattern().replace_all(&without_scripts, "");
  link_tag_pattern()
    .replace_all(&without_styles, "")
    .into_owned()
}

/// Value of the quoted `id` captured at groups `first` and `first + 1`.
fn captured_id<'a>(caps: &regex::Captures<'a>, first: usize) -> Option<&'a str> {
  caps
    .get(first)
    .or_else(|| caps.get(first + 1))
    .map(|m| m.as_str())
}

/// Whether any element carries `id="<id>"`.
pub fn has_element_id(document: &str, id: &str) -> bool {
  id_attribute_pattern()
    .captures_iter(document)
    .any(|caps| captured_id(&caps, 1) == Some(id))
}

/// The complete element carrying `id="<id>"`, including nested markup.
///
/// Nested elements with the same tag name are balanced, so a mount `<div>` that contains
/// server-rendered `<div>`s is returned whole. `None` when the element is missing or never
/// closed.
pub fn element_by_id<'a>(document: &'a str, id: &str) -> Option<&'a str> {
  let caps = id_element_pattern()
    .captures_iter(document)
    .find(|caps| captured_id(caps, 2) == Some(id))?;
  let open = caps.get(0)?;
  let tag = caps.get(1)?.as_str().to_ascii_lowercase();
  if open.as_str().ends_with("/>") {
    return Some(open.as_str());
  }

  let rest = &document[open.end()..];
  let mut depth = 1usize;
  for inner in any_tag_pattern().captures_iter(rest) {
    let (Some(whole), Some(closing), Some(name)) = (inner.get(0), inner.get(1), inner.get(2)) else {
      continue;
    };
    if !name.as_str().eq_ignore_ascii_case(&tag) {
      continue;
    }
    if closing.as_str() == "/" {
      depth -= 1;
      if depth == 0 {
        return Some(&document[open.start()..open.end() + whole.end()]);
      }
    } else if !whole.as_str().ends_with("/>") {
      depth += 1;
    }
  }

  None
}

/// Escape `</script` so inlined script text cannot close its element early.
pub fn escape_script_text(text: &str) -> Cow<'_, str> {
  script_close_pattern().replace_all(text, r"<\/$1")
}

/// Escape `</style` so inlined stylesheet text cannot close its element early.
pub fn escape_style_text(text: &str) -> Cow<'_, str> {
  style_close_pattern().replace_all(text, r"<\/$1")
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
  value
    .replace('&', "&amp;")
    .replace('"', "&quot;")
    .replace('<', "&lt;")
}
