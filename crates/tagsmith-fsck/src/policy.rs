use std::collections::BTreeMap;

use tracing::debug;

use crate::config::FsckConfig;
use crate::error::FsckResult;
use crate::rule::{RuleCode, Severity};

/// Resolves each rule to the severity it is reported with.
///
/// An explicit override for a rule always wins; otherwise the rule's
/// built-in default applies. Any rule may be overridden, including the ones
/// that guard required headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeverityPolicy {
    overrides: BTreeMap<RuleCode, Severity>,
}

impl SeverityPolicy {
    /// A policy with only the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from a configuration.
    pub fn from_config(config: &FsckConfig) -> FsckResult<Self> {
        let mut policy = Self::new();
        policy.apply_config(config)?;
        Ok(policy)
    }

    /// Effective severity for `code`.
    pub fn severity(&self, code: RuleCode) -> Severity {
        self.overrides
            .get(&code)
            .copied()
            .unwrap_or_else(|| code.default_severity())
    }

    /// Override the severity of `code`, returning the previous override.
    pub fn set_override(&mut self, code: RuleCode, severity: Severity) -> Option<Severity> {
        debug!(rule = %code, %severity, "severity override");
        self.overrides.insert(code, severity)
    }

    /// Drop the override for `code`, restoring its built-in default.
    pub fn clear_override(&mut self, code: RuleCode) -> Option<Severity> {
        self.overrides.remove(&code)
    }

    /// Override by rule and severity names, e.g. `("extraHeaderEntry", "ignore")`.
    pub fn set_by_name(&mut self, rule: &str, severity: &str) -> FsckResult<()> {
        let code: RuleCode = rule.parse()?;
        let severity: Severity = severity.parse()?;
        self.set_override(code, severity);
        Ok(())
    }

    /// Apply every `[fsck]` entry of `config` as an override.
    ///
    /// Entries are validated before any is applied, so a bad entry leaves
    /// the policy unchanged.
    pub fn apply_config(&mut self, config: &FsckConfig) -> FsckResult<()> {
        let rules = config.rules()?;
        for (code, severity) in rules {
            self.set_override(code, severity);
        }
        Ok(())
    }

    /// Iterate the explicit overrides.
    pub fn overrides(&self) -> impl Iterator<Item = (RuleCode, Severity)> + '_ {
        self.overrides.iter().map(|(c, s)| (*c, *s))
    }
}
