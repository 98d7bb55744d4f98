//! Stylesheet `url()` rewriting against the completed catalog.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::asset_paths::{resolve_style_reference, should_ignore_asset_reference};

fn url_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]+))\s*\)"#).expect("invalid url() regex")
  })
}

/// Result of rewriting one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenStyle {
  /// Stylesheet text with resolvable references replaced.
  pub content: String,
  /// References that named no cataloged binary and were left as written.
  pub unresolved: Vec<String>,
}

/// Replace every resolvable `url()` reference in `css` with `url("<data uri>")`.
///
/// `style_key` is the catalog key of the stylesheet, used as the base for relative
/// references. `lookup` maps a catalog key to the data URI of a cataloged binary. References
/// that cannot be resolved are kept verbatim.
pub fn rewrite_style_urls<'a, F>(css: &str, style_key: &str, lookup: F) -> RewrittenStyle
where
  F: Fn(&str) -> Option<&'a str>,
{
  let mut unresolved = Vec::new();
  let content = url_pattern()
    .replace_all(css, |caps: &Captures| {
      let original = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
      let reference = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

      if should_ignore_asset_reference(reference) {
        return original.to_string();
      }

      match resolve_style_reference(style_key, reference).and_then(|key| lookup(&key)) {
        Some(data_uri) => format!("url(\"{data_uri}\")"),
        None => {
          unresolved.push(reference.to_string());
          original.to_string()
        }
      }
    })
    .into_owned();

  RewrittenStyle {
    content,
    unresolved,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeMap;

  fn binaries() -> BTreeMap<String, String> {
    BTreeMap::from([
      ("css/img/a.png".to_string(), "data:image/png;base64,QQ==".to_string()),
      ("media/f.woff2".to_string(), "data:font/woff2;base64,Rg==".to_string()),
    ])
  }

  fn rewrite(css: &str, key: &str) -> RewrittenStyle {
    let map = binaries();
    rewrite_style_urls(css, key, |k| map.get(k).map(String::as_str))
  }

  #[test]
  fn replaces_quoted_and_unquoted_references() {
    let result = rewrite(
      ".a{background:url(./img/a.png)}.b{background:url('img/a.png')}\
       @font-face{src:url(\"../media/f.woff2?v=2\")}",
      "css/app.css",
    );

    assert_eq!(result.content.matches("url(\"data:image/png;base64,QQ==\")").count(), 2);
    assert!(result.content.contains("url(\"data:font/woff2;base64,Rg==\")"));
    assert!(!result.content.contains("img/a.png"));
    assert!(result.unresolved.is_empty());
  }

  #[test]
  fn leaves_external_and_unresolved_references_untouched() {
    let css = ".a{background:url(https://cdn.example.com/x.png)}\
               .b{background:url(missing.png)}\
               .c{background:url(data:image/gif;base64,R0lG)}";
    let result = rewrite(css, "css/app.css");

    assert_eq!(result.content, css);
    assert_eq!(result.unresolved, vec!["missing.png".to_string()]);
  }
}
