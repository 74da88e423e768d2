//! Payload tokenization: delimiter-aware splitting and the unquoted-colon
//! scanner. Tokens are never interpreted here; callers classify them.

use crate::common::Delimiter;

/// Split a payload into trimmed tokens on the given delimiter.
///
/// A backslash makes the next character literal and a double quote toggles
/// an in-quotes span in which the delimiter is not a boundary. Quotes and
/// escapes stay in the token text for later classification. For the comma
/// delimiter, `", "` is consumed as a single separator.
pub(crate) fn split_tokens(payload: &str, delim: Delimiter) -> Vec<String> {
    let delim_char = delim.as_char();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = payload.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c == delim_char && !in_quotes {
            if delim == Delimiter::Comma && chars.peek() == Some(&' ') {
                chars.next();
            }
            tokens.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

/// Byte offset of the first colon outside quotes, tracking a one-character
/// backslash escape. `None` means the line has no key.
pub(crate) fn find_unquoted_colon(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}
