//! Structural validation of tag records.
//!
//! A tag record is a block of header lines, a blank line, and a free-form
//! message:
//!
//! ```text
//! object <hex id>
//! type <blob|tree|commit|tag>
//! tag <name>
//! tagger <Name <email> seconds +HHMM>
//! [<key> <value>]*
//!
//! <message>
//! ```
//!
//! The [`TagValidator`] parses a record and raises [`RuleCode`]s. Each rule
//! is reported with the severity the [`SeverityPolicy`] assigns it, and the
//! [`Verdict`] is derived from those diagnostics and the strict flag alone:
//! `Error` always fails, `Warn` fails only in strict mode, `Ignore` is never
//! reported.
//!
//! # Quick Start
//!
//! ```rust
//! use tagsmith_fsck::{RuleCode, Severity, SeverityPolicy, TagValidator};
//!
//! let input = format!(
//!     "object {}\ntype blob\ntag v1\ntagger Ann <ann@example.com> 1700000000 +0000\nnote hi\n\nmsg\n",
//!     "ab".repeat(32)
//! );
//!
//! // The unknown "note" header is a warning, which strict mode escalates.
//! let strict = TagValidator::new(SeverityPolicy::new(), true);
//! assert!(!strict.validate(input.as_bytes()).is_pass());
//!
//! let mut policy = SeverityPolicy::new();
//! policy.set_override(RuleCode::ExtraHeaderEntry, Severity::Ignore);
//! let relaxed = TagValidator::new(policy, true);
//! assert!(relaxed.validate(input.as_bytes()).is_pass());
//! ```

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod ident;
pub mod policy;
pub mod record;
pub mod refname;
pub mod rule;
pub mod validator;

pub use config::FsckConfig;
pub use diagnostic::{Diagnostic, Verdict};
pub use error::{FsckError, FsckResult};
pub use policy::SeverityPolicy;
pub use record::TagRecord;
pub use rule::{RuleCode, Severity};
pub use validator::{TagValidation, TagValidator};
