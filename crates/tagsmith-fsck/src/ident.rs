//! Checks on the `tagger` identity line: `Name <email> <seconds> <+|-HHMM>`.

use crate::rule::RuleCode;

/// First problem found in an identity line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentProblem {
    pub code: RuleCode,
    pub message: &'static str,
}

impl IdentProblem {
    fn new(code: RuleCode, message: &'static str) -> Self {
        Self { code, message }
    }
}

/// Check an identity value (the text after `tagger `, without the newline).
///
/// Stops at the first problem; later fields are only meaningful once the
/// earlier ones are well-formed.
pub fn check_ident(ident: &[u8]) -> Result<(), IdentProblem> {
    let end = ident.len();
    let find = |from: usize, set: &[u8]| {
        ident[from..]
            .iter()
            .position(|b| set.contains(b))
            .map_or(end, |i| from + i)
    };

    if ident.first() == Some(&b'<') {
        return Err(IdentProblem::new(
            RuleCode::MissingNameBeforeEmail,
            "invalid tagger line - missing name before email",
        ));
    }

    let mut p = find(0, b"<>");
    match ident.get(p) {
        Some(b'>') => {
            return Err(IdentProblem::new(
                RuleCode::BadName,
                "invalid tagger line - bad name",
            ))
        }
        Some(b'<') => {}
        _ => {
            return Err(IdentProblem::new(
                RuleCode::MissingEmail,
                "invalid tagger line - missing email",
            ))
        }
    }
    if ident[p - 1] != b' ' {
        return Err(IdentProblem::new(
            RuleCode::MissingSpaceBeforeEmail,
            "invalid tagger line - missing space before email",
        ));
    }

    p = find(p + 1, b"<>");
    if ident.get(p) != Some(&b'>') {
        return Err(IdentProblem::new(
            RuleCode::BadEmail,
            "invalid tagger line - bad email",
        ));
    }
    p += 1;
    if ident.get(p) != Some(&b' ') {
        return Err(IdentProblem::new(
            RuleCode::MissingSpaceBeforeDate,
            "invalid tagger line - missing space before date",
        ));
    }
    p += 1;

    let digits = ident[p..].iter().take_while(|b| b.is_ascii_digit()).count();
    if ident.get(p) == Some(&b'0') && digits > 1 {
        return Err(IdentProblem::new(
            RuleCode::ZeroPaddedDate,
            "invalid tagger line - zero-padded date",
        ));
    }
    if digits > 0 {
        let seconds = std::str::from_utf8(&ident[p..p + digits]).unwrap_or_default();
        if seconds.parse::<u64>().is_err() {
            return Err(IdentProblem::new(
                RuleCode::BadDateOverflow,
                "invalid tagger line - date causes integer overflow",
            ));
        }
    }
    p += digits;
    if digits == 0 || ident.get(p) != Some(&b' ') {
        return Err(IdentProblem::new(
            RuleCode::BadDate,
            "invalid tagger line - bad date",
        ));
    }
    p += 1;

    match &ident[p..] {
        [sign, h1, h2, m1, m2]
            if matches!(*sign, b'+' | b'-')
                && [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()) =>
        {
            Ok(())
        }
        _ => Err(IdentProblem::new(
            RuleCode::BadTimezone,
            "invalid tagger line - bad time zone",
        )),
    }
}
