//! Input normalization ahead of markdown parsing
//!
//! Document content sometimes arrives JSON-string-encoded and/or with
//! two-character escape sequences instead of real control characters.
//! This stage turns that into literal text before anything structural
//! looks at it.

/// Convert possibly JSON-quoted, escape-laden text into literal text.
///
/// Total over all inputs: a malformed quoted string degrades to
/// best-effort unquoting rather than erroring.
pub fn normalize(input: &str) -> String {
    let mut text = input.to_string();

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = match serde_json::from_str::<String>(&text) {
            Ok(parsed) => parsed,
            // Best effort: drop the quotes and fall through to unescaping.
            Err(_) => text[1..text.len() - 1].to_string(),
        };
    }

    unescape_literals(&text)
}

/// Replace literal two-character escape sequences with the characters they
/// name. The backslash pair is resolved last so the earlier replacements
/// cannot chain into a double unescape.
pub fn unescape_literals(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\r", "\r")
        .replace("\\\"", "\"")
        .replace("\\t", "\t")
        .replace("\\\\", "\\")
}
