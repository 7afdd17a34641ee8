use tagsmith_types::{ObjectId, ObjectType};
use tracing::{debug, trace};

use crate::diagnostic::{Diagnostic, Verdict};
use crate::error::{FsckError, FsckResult};
use crate::ident::check_ident;
use crate::policy::SeverityPolicy;
use crate::record::TagRecord;
use crate::refname::check_tag_name;
use crate::rule::{RuleCode, Severity};

/// Structural validator for tag records.
///
/// Holds the severity policy and the strict flag. Overrides may be added
/// through [`TagValidator::policy_mut`] at any point before
/// [`TagValidator::validate`]; each diagnostic reads the policy when it is
/// raised.
#[derive(Clone, Debug)]
pub struct TagValidator {
    policy: SeverityPolicy,
    strict: bool,
}

impl Default for TagValidator {
    fn default() -> Self {
        Self::new(SeverityPolicy::new(), true)
    }
}

impl TagValidator {
    pub fn new(policy: SeverityPolicy, strict: bool) -> Self {
        Self { policy, strict }
    }

    pub fn policy(&self) -> &SeverityPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut SeverityPolicy {
        &mut self.policy
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Parse `input` and collect every diagnostic the parser can reach.
    ///
    /// Parsing only stops early when a required header is missing.
    pub fn validate(&self, input: &[u8]) -> TagValidation {
        let mut reporter = Reporter {
            policy: &self.policy,
            diagnostics: Vec::new(),
        };
        let fields = parse(input, &mut reporter);
        let validation = TagValidation {
            diagnostics: reporter.diagnostics,
            strict: self.strict,
            fields,
        };
        debug!(
            strict = self.strict,
            diagnostics = validation.diagnostics.len(),
            verdict = ?validation.verdict(),
            "validated tag input"
        );
        validation
    }
}

/// Outcome of validating one tag input.
#[derive(Clone, Debug)]
pub struct TagValidation {
    diagnostics: Vec<Diagnostic>,
    strict: bool,
    fields: ParsedFields,
}

impl TagValidation {
    /// Every reported diagnostic, in the order raised. Ignored rules are absent.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_diagnostics(&self.diagnostics, self.strict)
    }

    pub fn is_pass(&self) -> bool {
        self.verdict().is_pass()
    }

    /// Diagnostics that fail validation.
    pub fn fatal(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_fatal(self.strict))
    }

    /// Diagnostics that are reported but do not fail validation.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity != Severity::Ignore && !d.is_fatal(self.strict))
    }

    /// The `(object, type)` pair, if both headers parsed.
    pub fn target(&self) -> Option<(ObjectId, ObjectType)> {
        self.fields.target.zip(self.fields.target_type)
    }

    /// Convert into a [`TagRecord`], or the fatal diagnostics on failure.
    pub fn into_record(self) -> FsckResult<TagRecord> {
        if !self.is_pass() {
            let diagnostics = self.fatal().cloned().collect();
            return Err(FsckError::Rejected { diagnostics });
        }
        let fields = self.fields;
        let target = fields.target.ok_or(FsckError::Incomplete { field: "object" })?;
        let target_type = fields
            .target_type
            .ok_or(FsckError::Incomplete { field: "type" })?;
        let name = fields.name.ok_or(FsckError::Incomplete { field: "tag" })?;
        Ok(TagRecord::new(
            target,
            target_type,
            name,
            fields.tagger,
            fields.extra_headers,
            fields.message,
        ))
    }
}

#[derive(Clone, Debug, Default)]
struct ParsedFields {
    target: Option<ObjectId>,
    target_type: Option<ObjectType>,
    name: Option<String>,
    tagger: Option<String>,
    extra_headers: Vec<(String, String)>,
    message: Vec<u8>,
}

struct Reporter<'p> {
    policy: &'p SeverityPolicy,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter<'_> {
    fn report(&mut self, code: RuleCode, message: impl Into<String>) {
        let severity = self.policy.severity(code);
        if severity == Severity::Ignore {
            trace!(rule = %code, "ignored");
            return;
        }
        let diagnostic = Diagnostic::new(code, severity, message);
        debug!(%diagnostic, %severity, "fsck");
        self.diagnostics.push(diagnostic);
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Split `input` into the header block (without its final newline) and the
/// message, raising the header-termination rules.
fn split_headers<'a>(input: &'a [u8], reporter: &mut Reporter<'_>) -> (&'a [u8], &'a [u8]) {
    let blank = if input.first() == Some(&b'\n') {
        Some(0)
    } else {
        input.windows(2).position(|w| w == b"\n\n").map(|i| i + 1)
    };
    let header_end = blank.unwrap_or(input.len());

    if let Some(offset) = input[..header_end].iter().position(|b| *b == 0) {
        reporter.report(
            RuleCode::NulInHeader,
            format!("unterminated header: NUL at offset {offset}"),
        );
    }

    match blank {
        Some(end) => {
            let headers = &input[..end];
            (headers.strip_suffix(b"\n").unwrap_or(headers), &input[end + 1..])
        }
        None => {
            reporter.report(RuleCode::UnterminatedHeader, "unterminated header");
            (input.strip_suffix(b"\n").unwrap_or(input), &input[input.len()..])
        }
    }
}

fn parse(input: &[u8], reporter: &mut Reporter<'_>) -> ParsedFields {
    let mut fields = ParsedFields::default();
    let (headers, message) = split_headers(input, reporter);
    fields.message = message.to_vec();

    let lines: Vec<&[u8]> = if headers.is_empty() {
        Vec::new()
    } else {
        headers.split(|b| *b == b'\n').collect()
    };
    let mut lines = lines.into_iter().peekable();

    let Some(object) = lines.next().and_then(|l| l.strip_prefix(b"object ")) else {
        reporter.report(RuleCode::MissingObject, "invalid format - expected 'object' line");
        return fields;
    };
    match std::str::from_utf8(object).ok().and_then(|s| s.parse().ok()) {
        Some(id) => fields.target = Some(id),
        None => reporter.report(
            RuleCode::BadObjectSha,
            format!("invalid 'object' line format - bad object id {:?}", lossy(object)),
        ),
    }

    let Some(kind) = lines.next().and_then(|l| l.strip_prefix(b"type ")) else {
        reporter.report(RuleCode::MissingTypeEntry, "invalid format - expected 'type' line");
        return fields;
    };
    match std::str::from_utf8(kind).ok().and_then(|s| s.parse().ok()) {
        Some(kind) => fields.target_type = Some(kind),
        None => reporter.report(
            RuleCode::BadType,
            format!("invalid 'type' value {:?}", lossy(kind)),
        ),
    }

    let Some(name) = lines.next().and_then(|l| l.strip_prefix(b"tag ")) else {
        reporter.report(RuleCode::MissingTagEntry, "invalid format - expected 'tag' line");
        return fields;
    };
    let name = lossy(name);
    if let Err(reason) = check_tag_name(&name) {
        reporter.report(
            RuleCode::BadTagName,
            format!("invalid 'tag' name: {name} ({reason})"),
        );
    }
    fields.name = Some(name);

    match lines.next_if(|l| l.starts_with(b"tagger ")) {
        Some(line) => {
            let ident = &line[b"tagger ".len()..];
            if let Err(problem) = check_ident(ident) {
                reporter.report(problem.code, problem.message);
            }
            fields.tagger = Some(lossy(ident));
        }
        None => reporter.report(
            RuleCode::MissingTaggerEntry,
            "invalid format - expected 'tagger' line",
        ),
    }

    for line in lines {
        let (key, value) = match line.iter().position(|b| *b == b' ') {
            Some(i) => (&line[..i], &line[i + 1..]),
            None => (line, &line[line.len()..]),
        };
        let key = lossy(key);
        reporter.report(
            RuleCode::ExtraHeaderEntry,
            format!("invalid format - extra header {key:?} after 'tagger'"),
        );
        fields.extra_headers.push((key, lossy(value)));
    }

    fields
}
