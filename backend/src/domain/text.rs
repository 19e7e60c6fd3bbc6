//! Shared text patterns for validating user-supplied fields.

use std::sync::OnceLock;

use regex::Regex;

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Matches runs of word characters (letters, digits, underscore).
pub(crate) fn word_regex() -> &'static Regex {
    WORD_RE.get_or_init(|| {
        Regex::new(r"\w+").unwrap_or_else(|error| panic!("word regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\S+@\S+\.\S+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// True when `value` contains at least one word character.
pub(crate) fn has_word(value: &str) -> bool {
    word_regex().is_match(value)
}

/// True when `value` looks like `local@domain.tld`.
pub(crate) fn is_email_shaped(value: &str) -> bool {
    email_regex().is_match(value)
}
