//! Defensive cleanup of external script and link tags left in an assembled artifact.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Element text that cannot contain the start of another `<script` or `</script`, so a
/// paired match never spans into the next script element.
const SCRIPT_BODY: &str = r"(?:[^<]|<[^/s]|<s[^c]|</[^s]|</s[^c])*?";

fn removal_patterns() -> &'static [Regex] {
  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(&format!(
          r#"(?is)<script\b[^>]*?\ssrc\s*=\s*"[^"]*"[^>]*>{SCRIPT_BODY}</script\s*>"#
        ))
        .expect("invalid paired double-quoted script regex"),
        Regex::new(&format!(
          r#"(?is)<script\b[^>]*?\ssrc\s*=\s*'[^']*'[^>]*>{SCRIPT_BODY}</script\s*>"#
        ))
        .expect("invalid paired single-quoted script regex"),
        Regex::new(r#"(?i)<script\b[^>]*?\ssrc\s*=\s*"[^"]*"[^>]*>"#)
          .expect("invalid double-quoted script regex"),
        Regex::new(r#"(?i)<script\b[^>]*?\ssrc\s*=\s*'[^']*'[^>]*>"#)
          .expect("invalid single-quoted script regex"),
        Regex::new(r#"(?i)<script\b[^>]*?\ssrc\s*=\s*[^\s"'>]+[^>]*>"#)
          .expect("invalid unquoted script regex"),
        Regex::new(r"(?i)<link\b[^>]*>").expect("invalid link regex"),
      ]
    })
    .as_slice()
}

fn reference_attribute() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"(?i)\s(?:src|href)\s*=\s*["']?([^"'\s>]*)"#).expect("invalid reference regex")
  })
}

/// Whether a tag points at something outside the artifact. Tags whose reference is a data
/// URI, and link tags without any `href`, are self-contained.
fn is_external_tag(tag: &str) -> bool {
  reference_attribute()
    .captures(tag)
    .and_then(|caps| caps.get(1))
    .is_some_and(|reference| !reference.as_str().to_ascii_lowercase().starts_with("data:"))
}

/// Remove every remaining externally-referenced `<script src>` and `<link href>` tag.
///
/// Passes repeat until nothing changes, so the output is a fixed point: running the cleanup
/// again on its own output returns it unchanged.
pub fn strip_external_references(html: &str) -> String {
  let mut current = html.to_string();
  loop {
    let next = removal_pass(&current);
    if next == current {
      return current;
    }
    current = next;
  }
}

fn removal_pass(html: &str) -> String {
  removal_patterns()
    .iter()
    .fold(html.to_string(), |text, pattern| {
      pattern
        .replace_all(&text, |caps: &Captures| {
          let tag = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
          if is_external_tag(tag) {
            String::new()
          } else {
            tag.to_string()
          }
        })
        .into_owned()
    })
}
