//! Findings collected while inspecting an artifact.

use std::fmt;

const RULE_WIDTH: usize = 50;

/// Outcome class of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
  /// The check passed.
  Success,
  /// Suspicious but not disqualifying.
  Warning,
  /// The artifact is not self-contained.
  Error,
}

/// One recorded check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
  /// Outcome class.
  pub severity: Severity,
  /// Human readable description.
  pub message: String,
}

/// Ordered findings for one artifact. The artifact passes iff no finding is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
  findings: Vec<Finding>,
}

impl ValidationReport {
  /// Empty report.
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a finding.
  pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
    self.findings.push(Finding {
      severity,
      message: message.into(),
    });
  }

  /// Record a passed check.
  pub fn success(&mut self, message: impl Into<String>) {
    self.push(Severity::Success, message);
  }

  /// Record a warning.
  pub fn warning(&mut self, message: impl Into<String>) {
    self.push(Severity::Warning, message);
  }

  /// Record an error.
  pub fn error(&mut self, message: impl Into<String>) {
    self.push(Severity::Error, message);
  }

  /// Findings in the order they were recorded.
  pub fn findings(&self) -> &[Finding] {
    &self.findings
  }

  /// Findings of one severity, in recording order.
  pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
    self
      .findings
      .iter()
      .filter(move |finding| finding.severity == severity)
  }

  /// Number of findings of one severity.
  pub fn count(&self, severity: Severity) -> usize {
    self.with_severity(severity).count()
  }

  /// Whether the artifact passed.
  pub fn passed(&self) -> bool {
    self.count(Severity::Error) == 0
  }

  /// Sectioned, human readable report ending in a verdict line.
  pub fn render(&self) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("VALIDATION REPORT\n{rule}\n");

    let sections = [
      (Severity::Success, "SUCCESS CHECKS", "ok"),
      (Severity::Warning, "WARNINGS", "warn"),
      (Severity::Error, "ERRORS", "fail"),
    ];
    for (severity, heading, marker) in sections {
      if self.count(severity) == 0 {
        continue;
      }
      out.push_str(&format!("\n{heading}:\n"));
      for finding in self.with_severity(severity) {
        out.push_str(&format!("  [{marker}] {}\n", finding.message));
      }
    }

    out.push_str(&format!("\n{rule}\n"));
    if self.passed() {
      out.push_str("VALIDATION PASSED - artifact appears to be self-contained\n");
    } else {
      out.push_str(&format!(
        "VALIDATION FAILED - {} error(s) need to be addressed\n",
        self.count(Severity::Error)
      ));
    }
    out
  }
}

impl fmt::Display for ValidationReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render())
  }
}
