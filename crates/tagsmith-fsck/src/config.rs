use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FsckError, FsckResult};
use crate::rule::{RuleCode, Severity};

/// Configuration key prefix for rule severities.
pub const FSCK_SECTION: &str = "fsck";

/// Severity overrides loaded from configuration.
///
/// TOML form:
/// ```toml
/// [fsck]
/// extraHeaderEntry = "ignore"
/// badTagName = "warn"
/// ```
///
/// Rule names are not checked until [`FsckConfig::rules`] runs, so a
/// configuration can be loaded and merged before it is validated. Other
/// top-level tables are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsckConfig {
    #[serde(default)]
    pub fsck: BTreeMap<String, Severity>,
}

impl FsckConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> FsckResult<Self> {
        toml::from_str(s).map_err(|e| FsckError::Config(e.to_string()))
    }

    /// Load and parse a TOML file.
    pub fn load(path: &Path) -> FsckResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| FsckError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Set `fsck.<rule>` to `value`, replacing any entry for the same rule
    /// regardless of how its name was cased.
    pub fn set(&mut self, key: &str, value: &str) -> FsckResult<()> {
        let rule = key
            .split_once('.')
            .filter(|(section, _)| section.eq_ignore_ascii_case(FSCK_SECTION))
            .map(|(_, rule)| rule)
            .ok_or_else(|| {
                FsckError::Config(format!(
                    "unsupported key {key:?}: expected '{FSCK_SECTION}.<rule>'"
                ))
            })?;
        let code: RuleCode = rule.parse()?;
        let severity: Severity = value.parse()?;
        self.fsck.retain(|name, _| !name.eq_ignore_ascii_case(code.name()));
        self.fsck.insert(code.name().to_string(), severity);
        Ok(())
    }

    /// Apply a `key=value` assignment, as given on the command line.
    pub fn set_assignment(&mut self, assignment: &str) -> FsckResult<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            FsckError::Config(format!("expected <key>=<value>, got {assignment:?}"))
        })?;
        self.set(key.trim(), value.trim())
    }

    /// Merge `other` on top of `self`; entries in `other` win.
    pub fn merge(&mut self, other: &FsckConfig) {
        for (name, severity) in &other.fsck {
            self.fsck.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            self.fsck.insert(name.clone(), *severity);
        }
    }

    /// Resolve every entry to a rule, failing on the first unknown name.
    pub fn rules(&self) -> FsckResult<Vec<(RuleCode, Severity)>> {
        self.fsck
            .iter()
            .map(|(name, severity)| Ok((name.parse::<RuleCode>()?, *severity)))
            .collect()
    }

    /// Returns `true` if no overrides are configured.
    pub fn is_empty(&self) -> bool {
        self.fsck.is_empty()
    }
}
