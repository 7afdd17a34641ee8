//! Tag name validation following git-style reference naming rules.
//!
//! A tag name is checked as if it were the reference `refs/tags/<name>`:
//! - Must be non-empty
//! - Must not contain control characters, whitespace, `~`, `^`, `:`, `?`,
//!   `*`, `[`, `\`
//! - Must not contain `..` (double dot) or `@{`
//! - Must not be `@`, and must not end with `.` or `/`
//! - Must not contain consecutive slashes (`//`)
//! - Components between slashes must be non-empty, must not start with `.`
//!   and must not end with `.lock`

/// Characters that are forbidden anywhere in a reference name.
const FORBIDDEN_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a tag name, returning the reason it is rejected.
///
/// # Examples
///
/// ```
/// use tagsmith_fsck::refname::check_tag_name;
///
/// assert!(check_tag_name("v1.0").is_ok());
/// assert!(check_tag_name("release/2024-01").is_ok());
/// assert!(check_tag_name("").is_err());
/// assert!(check_tag_name("bad..name").is_err());
/// ```
pub fn check_tag_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("tag name must not be empty".into());
    }

    if name == "@" {
        return Err("must not be '@'".into());
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(format!("contains control character: {ch:?}"));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(format!("contains forbidden character: {ch:?}"));
        }
    }

    // Must not contain `..` (parent traversal).
    if name.contains("..") {
        return Err("must not contain '..'".into());
    }

    // Must not contain `@{` (reflog syntax).
    if name.contains("@{") {
        return Err("must not contain '@{'".into());
    }

    if name.ends_with('.') {
        return Err("must not end with '.'".into());
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err("must not start or end with '/'".into());
    }

    if name.contains("//") {
        return Err("must not contain consecutive slashes '//'".into());
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(format!("component must not start with '.': {component:?}"));
        }
        if component.ends_with(".lock") {
            return Err(format!("component must not end with '.lock': {component:?}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["v1.0", "v1.0.0-rc1", "release/2024", "a/b/c", "with-dash_and_underscore", "@x"] {
            assert!(check_tag_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn empty_and_at_are_invalid() {
        assert!(check_tag_name("").is_err());
        assert!(check_tag_name("@").is_err());
    }

    #[test]
    fn forbidden_characters() {
        for name in ["has space", "tilde~", "caret^", "colon:", "q?", "star*", "bracket[", "back\\slash", "tab\there", "nul\0"] {
            assert!(check_tag_name(name).is_err(), "{name:?} should be invalid");
        }
    }

    #[test]
    fn dot_rules() {
        assert!(check_tag_name("a..b").is_err());
        assert!(check_tag_name(".hidden").is_err());
        assert!(check_tag_name("dir/.hidden").is_err());
        assert!(check_tag_name("trailing.").is_err());
        assert!(check_tag_name("v1.lock").is_err());
        assert!(check_tag_name("v1.lock/x").is_err());
    }

    #[test]
    fn slash_rules() {
        assert!(check_tag_name("/lead").is_err());
        assert!(check_tag_name("trail/").is_err());
        assert!(check_tag_name("a//b").is_err());
    }

    #[test]
    fn reflog_syntax_rejected() {
        let reason = check_tag_name("v1@{0}").unwrap_err();
        assert!(reason.contains("@{"));
    }
}
