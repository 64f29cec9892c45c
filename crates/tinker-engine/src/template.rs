//! Template resolution — substituting supplied values into prompt text.

use std::collections::HashMap;

use crate::variables::placeholder_re;

/// Replace every `@name` token that has a supplied value with that value;
/// tokens without a value are left verbatim. Substitution happens in a
/// single pass over the tokenized input, so a value containing `@` is
/// never re-scanned and a name that prefixes a longer name (`@topic` vs
/// `@topicId`) cannot corrupt it.
pub fn resolve_template(text: &str, values: &HashMap<String, String>) -> String {
    placeholder_re()
        .replace_all(text, |caps: &regex::Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
