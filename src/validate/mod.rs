//! Read-only inspection of a finished artifact.
//!
//! The validator shares no state with the bundler. It reads an artifact from disk, runs a
//! fixed list of checks and records each outcome in a [`ValidationReport`].

mod report;

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::bundle::html::has_element_id;
use crate::project::DEFAULT_MOUNT_ELEMENT_ID;

pub use report::{Finding, Severity, ValidationReport};

/// Text fragments that indicate a failed load captured into the artifact, with the finding
/// reported for each.
pub const FAILURE_SIGNATURES: &[(&str, &str)] = &[
  ("ERR_FILE_NOT_FOUND", "Contains file not found error patterns"),
  ("ERR_FAILED", "Contains failed request error patterns"),
  ("ChunkLoadError", "Contains chunk loading error patterns"),
  ("CORS policy", "Contains CORS policy error patterns"),
];

/// Link relations whose external target the page cannot render without.
const BLOCKING_LINK_RELATIONS: &[&str] = &["stylesheet", "preload", "modulepreload"];

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
  cell.get_or_init(|| Regex::new(pattern).expect("invalid validator regex"))
}

fn doctype_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?i)<!doctype\s+html")
}

fn html_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?i)<html[\s>]")
}

fn head_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?i)<head[\s>]")
}

fn body_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?i)<body[\s>]")
}

fn script_tag_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?i)<script\b[^>]*>")
}

fn link_tag_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?i)<link\b[^>]*>")
}

fn data_uri_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r#"data:[^"'\s)]+"#)
}

fn script_block_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?is)<script\b[^>]*>(.*?)</script\s*>")
}

fn style_block_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r"(?is)<style\b[^>]*>(.*?)</style\s*>")
}

fn src_attribute_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r#"(?i)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
}

fn href_attribute_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r#"(?i)\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
}

fn rel_attribute_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  regex(&PATTERN, r#"(?i)\srel\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
}

/// Value captured by one of the attribute patterns in a single start tag.
fn attribute<'a>(tag: &'a str, pattern: &Regex) -> Option<&'a str> {
  let caps = pattern.captures(tag)?;
  (1..=3)
    .find_map(|index| caps.get(index))
    .map(|m| m.as_str())
}

fn is_external(reference: &str) -> bool {
  !reference.trim().to_ascii_lowercase().starts_with("data:")
}

fn count_non_empty_blocks(pattern: &Regex, html: &str) -> usize {
  pattern
    .captures_iter(html)
    .filter(|caps| caps.get(1).is_some_and(|inner| !inner.as_str().trim().is_empty()))
    .count()
}

/// Checks an artifact for remaining external dependencies and captured load failures.
#[derive(Debug, Clone)]
pub struct Validator {
  mount_ids: Vec<String>,
}

impl Default for Validator {
  fn default() -> Self {
    Self {
      mount_ids: vec![DEFAULT_MOUNT_ELEMENT_ID.to_string(), "root".to_string()],
    }
  }
}

impl Validator {
  /// Validator looking for the default framework mount markers.
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the element ids accepted as a framework mount marker.
  pub fn with_mount_ids<I, S>(mut self, ids: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.mount_ids = ids.into_iter().map(Into::into).collect();
    self
  }

  /// Read and validate the artifact at `path`. Read failures become error findings.
  pub fn validate_file(&self, path: &Path) -> ValidationReport {
    info!("Validating standalone HTML file: {}", path.display());
    match fs::read_to_string(path) {
      Ok(html) => {
        info!("File size: {:.2}MB", html.len() as f64 / 1024.0 / 1024.0);
        self.validate_str(&html)
      }
      Err(err) => {
        let mut report = ValidationReport::new();
        report.error(format!("Failed to read file {}: {err}", path.display()));
        report
      }
    }
  }

  /// Validate artifact text.
  pub fn validate_str(&self, html: &str) -> ValidationReport {
    let mut report = ValidationReport::new();

    if html.is_empty() {
      report.error("File is empty");
      return report;
    }
    report.success("File is readable and not empty");

    check_structure(html, &mut report);
    check_scripts(html, &mut report);
    check_links(html, &mut report);
    check_inlined_content(html, &mut report);
    self.check_mount_marker(html, &mut report);

    for (signature, message) in FAILURE_SIGNATURES {
      if html.contains(signature) {
        report.error(*message);
      }
    }

    report
  }

  fn check_mount_marker(&self, html: &str, report: &mut ValidationReport) {
    match self.mount_ids.iter().find(|id| has_element_id(html, id)) {
      Some(id) => report.success(format!("Mount element #{id} found")),
      None => report.warning("No framework mount element found"),
    }
  }
}

fn check_structure(html: &str, report: &mut ValidationReport) {
  let markers = [
    (doctype_pattern(), "Valid DOCTYPE found", "Missing DOCTYPE declaration"),
    (html_pattern(), "HTML tag found", "Missing HTML tag"),
    (head_pattern(), "Head section found", "Missing head section"),
    (body_pattern(), "Body section found", "Missing body section"),
  ];
  for (pattern, found, missing) in markers {
    if pattern.is_match(html) {
      report.success(found);
    } else {
      report.error(missing);
    }
  }
}

fn check_scripts(html: &str, report: &mut ValidationReport) {
  let external: Vec<&str> = script_tag_pattern()
    .find_iter(html)
    .map(|m| m.as_str())
    .filter(|tag| attribute(tag, src_attribute_pattern()).is_some_and(is_external))
    .collect();

  if external.is_empty() {
    report.success("No external script dependencies found");
    return;
  }
  report.error(format!("Found {} external script tags", external.len()));
  for tag in external {
    report.error(format!("External script: {tag}"));
  }
}

fn check_links(html: &str, report: &mut ValidationReport) {
  let mut blocking = 0;
  let mut other = 0;

  for tag in link_tag_pattern().find_iter(html).map(|m| m.as_str()) {
    if !attribute(tag, href_attribute_pattern()).is_some_and(is_external) {
      continue;
    }
    let rel = attribute(tag, rel_attribute_pattern()).unwrap_or_default().to_ascii_lowercase();
    if rel
      .split_whitespace()
      .any(|value| BLOCKING_LINK_RELATIONS.contains(&value))
    {
      blocking += 1;
      report.error(format!("External style or preload link: {tag}"));
    } else {
      other += 1;
      report.warning(format!("External link: {tag}"));
    }
  }

  if blocking == 0 {
    report.success("No external style dependencies found");
  }
  if other > 0 {
    report.warning(format!("Found {other} other external link tags"));
  }
}

fn check_inlined_content(html: &str, report: &mut ValidationReport) {
  let data_uris = data_uri_pattern().find_iter(html).count();
  if data_uris > 0 {
    report.success(format!("Found {data_uris} inlined assets (data URLs)"));
  } else {
    report.warning("No inlined assets found");
  }

  let scripts = count_non_empty_blocks(script_block_pattern(), html);
  if scripts > 0 {
    report.success(format!("Found {scripts} script tags with content"));
  } else {
    report.warning("No script tags with content found");
  }

  let styles = count_non_empty_blocks(style_block_pattern(), html);
  if styles > 0 {
    report.success(format!("Found {styles} style tags with content"));
  } else {
    report.warning("No style tags with content found");
  }
}
