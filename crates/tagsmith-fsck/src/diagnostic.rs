use std::fmt;

use serde::Serialize;

use crate::rule::{RuleCode, Severity};

/// A rule raised while parsing, with the severity it resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: RuleCode,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: RuleCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
        }
    }

    /// Whether this diagnostic fails validation under the given mode.
    pub fn is_fatal(&self, strict: bool) -> bool {
        match self.severity {
            Severity::Error => true,
            Severity::Warn => strict,
            Severity::Ignore => false,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Pass/fail outcome of structural validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Derive the verdict from a set of diagnostics.
    ///
    /// Fails if any diagnostic is fatal under `strict`; otherwise passes.
    pub fn from_diagnostics(diagnostics: &[Diagnostic], strict: bool) -> Self {
        if diagnostics.iter().any(|d| d.is_fatal(strict)) {
            Self::Fail
        } else {
            Self::Pass
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}
