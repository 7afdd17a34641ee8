use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FsckError;

/// A named structural constraint on a tag record.
///
/// The camelCase [`RuleCode::name`] is the stable identifier used in
/// configuration (`fsck.<name> = "<severity>"`) and in reported diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleCode {
    /// A NUL byte appears before the blank line ending the headers.
    NulInHeader,
    /// No blank line separates the headers from the message.
    UnterminatedHeader,
    /// The first header is not `object`.
    MissingObject,
    /// The `object` value is not a canonical object ID.
    BadObjectSha,
    /// The second header is not `type`.
    MissingTypeEntry,
    /// The `type` value is not a known object type.
    BadType,
    /// The third header is not `tag`.
    MissingTagEntry,
    /// The tag name is not a valid reference name.
    BadTagName,
    /// No `tagger` header follows `tag`.
    MissingTaggerEntry,
    /// The tagger identity starts with `<`.
    MissingNameBeforeEmail,
    /// The tagger name contains `>`.
    BadName,
    /// The tagger identity has no `<email>`.
    MissingEmail,
    /// The tagger name is not followed by a space.
    MissingSpaceBeforeEmail,
    /// The tagger email is unterminated or contains `<`.
    BadEmail,
    /// No space between the email and the timestamp.
    MissingSpaceBeforeDate,
    /// The timestamp has a leading zero.
    ZeroPaddedDate,
    /// The timestamp does not fit in 64 bits.
    BadDateOverflow,
    /// The timestamp is missing or not followed by a space.
    BadDate,
    /// The timezone is not `[+-]HHMM`.
    BadTimezone,
    /// An unrecognized header line appears before the message.
    ExtraHeaderEntry,
}

impl RuleCode {
    /// Every rule, in catalog order.
    pub const ALL: [RuleCode; 20] = [
        Self::NulInHeader,
        Self::UnterminatedHeader,
        Self::MissingObject,
        Self::BadObjectSha,
        Self::MissingTypeEntry,
        Self::BadType,
        Self::MissingTagEntry,
        Self::BadTagName,
        Self::MissingTaggerEntry,
        Self::MissingNameBeforeEmail,
        Self::BadName,
        Self::MissingEmail,
        Self::MissingSpaceBeforeEmail,
        Self::BadEmail,
        Self::MissingSpaceBeforeDate,
        Self::ZeroPaddedDate,
        Self::BadDateOverflow,
        Self::BadDate,
        Self::BadTimezone,
        Self::ExtraHeaderEntry,
    ];

    /// Configuration name of the rule.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NulInHeader => "nulInHeader",
            Self::UnterminatedHeader => "unterminatedHeader",
            Self::MissingObject => "missingObject",
            Self::BadObjectSha => "badObjectSha",
            Self::MissingTypeEntry => "missingTypeEntry",
            Self::BadType => "badType",
            Self::MissingTagEntry => "missingTagEntry",
            Self::BadTagName => "badTagName",
            Self::MissingTaggerEntry => "missingTaggerEntry",
            Self::MissingNameBeforeEmail => "missingNameBeforeEmail",
            Self::BadName => "badName",
            Self::MissingEmail => "missingEmail",
            Self::MissingSpaceBeforeEmail => "missingSpaceBeforeEmail",
            Self::BadEmail => "badEmail",
            Self::MissingSpaceBeforeDate => "missingSpaceBeforeDate",
            Self::ZeroPaddedDate => "zeroPaddedDate",
            Self::BadDateOverflow => "badDateOverflow",
            Self::BadDate => "badDate",
            Self::BadTimezone => "badTimezone",
            Self::ExtraHeaderEntry => "extraHeaderEntry",
        }
    }

    /// Built-in severity used when no override is configured.
    pub const fn default_severity(&self) -> Severity {
        match self {
            Self::ExtraHeaderEntry => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleCode {
    type Err = FsckError;

    /// Look a rule up by name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FsckError::UnknownRule(s.to_string()))
    }
}

/// How a raised rule is treated.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    /// Not reported at all.
    Ignore,
    /// Reported; fatal only in strict mode.
    Warn,
    /// Always fatal.
    Error,
}

impl Severity {
    /// Lowercase configuration spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = FsckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Ignore, Self::Warn, Self::Error]
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FsckError::InvalidSeverity {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Severity {
    type Error = FsckError;

    fn try_from(s: String) -> Result<Self, FsckError> {
        s.parse()
    }
}
