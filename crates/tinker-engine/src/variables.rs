//! Placeholder extraction.
//!
//! A placeholder is `@` immediately followed by one or more word
//! characters; the sigil is stripped to yield the variable name. Greedy
//! `\w+` matching makes tokenization word-boundary safe: `@topicId` is
//! one token, never `@topic` plus `Id`.

use std::sync::OnceLock;

use regex::Regex;

/// The shared placeholder pattern, compiled once.
pub(crate) fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(\w+)").unwrap())
}

/// Extract variable names from prompt text: deduplicated, in order of
/// first occurrence. Pure function of the input string.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_re().captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
