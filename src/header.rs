//! Array header grammar: `key[N<delim>]{fields}: payload`.

use crate::common::Delimiter;
use crate::error::DecodeError;
use crate::lexical::parse_key;
use crate::tokenize::{find_unquoted_colon, split_tokens};

/// A parsed array header line.
#[derive(Debug, Clone)]
pub(crate) struct ArrayHeader {
    /// Key prefix; absent for root arrays and array elements.
    pub key: Option<String>,
    /// Declared element count.
    pub len: usize,
    /// Delimiter bound to this array's payload and rows.
    pub delimiter: Delimiter,
    /// Field names, present iff the array is tabular. Declared order.
    pub fields: Option<Vec<String>>,
    /// Inline payload after the colon; `None` when the body is expanded.
    pub payload: Option<String>,
}

/// Whether trimmed content starts with a keyless header (`[N<delim?>]`),
/// the root-array test.
pub(crate) fn is_bare_header(content: &str) -> bool {
    let Some(rest) = content.strip_prefix('[') else {
        return false;
    };
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return false;
    }
    let rest = &rest[digits..];
    rest.starts_with(']') || rest.starts_with("\t]") || rest.starts_with("|]")
}

/// Try to read a line as an array header.
///
/// `None` means the line is not header-shaped (no unquoted `[` ahead of
/// the key/value colon); `Some(Err)` means it is header-shaped but
/// malformed.
pub(crate) fn parse_header(
    content: &str,
    line: usize,
) -> Option<Result<ArrayHeader, DecodeError>> {
    let bracket = find_unquoted_bracket(content)?;
    match find_unquoted_colon(content) {
        Some(colon) if colon > bracket => {}
        _ => return None,
    }
    Some(parse_at_bracket(content, bracket, line))
}

fn parse_at_bracket(
    content: &str,
    bracket: usize,
    line: usize,
) -> Result<ArrayHeader, DecodeError> {
    let key_part = content[..bracket].trim();
    let key = if key_part.is_empty() {
        None
    } else {
        Some(parse_key(key_part, line)?)
    };

    let after_bracket = &content[bracket + 1..];
    let close = after_bracket
        .find(']')
        .ok_or_else(|| DecodeError::invalid_header(line, "missing ]"))?;
    let (count_part, delimiter) = match after_bracket[..close].as_bytes() {
        [digits @ .., b'\t'] => (digits, Delimiter::Tab),
        [digits @ .., b'|'] => (digits, Delimiter::Pipe),
        digits => (digits, Delimiter::Comma),
    };
    if count_part.is_empty() || !count_part.iter().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::invalid_header(line, "non-numeric length"));
    }
    let len: usize = std::str::from_utf8(count_part)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DecodeError::invalid_header(line, "length out of range"))?;

    let mut rest = &after_bracket[close + 1..];
    let fields = if let Some(brace_body) = rest.strip_prefix('{') {
        let brace = find_unquoted_brace(brace_body)
            .ok_or_else(|| DecodeError::invalid_header(line, "missing }"))?;
        let fields_str = &brace_body[..brace];
        if fields_str.trim().is_empty() {
            return Err(DecodeError::invalid_header(line, "empty field list"));
        }
        let names = split_tokens(fields_str, delimiter)
            .iter()
            .map(|t| parse_key(t, line))
            .collect::<Result<Vec<_>, _>>()?;
        rest = &brace_body[brace + 1..];
        Some(names)
    } else {
        None
    };

    let Some(after_colon) = rest.strip_prefix(':') else {
        return Err(DecodeError::invalid_header(line, "missing colon"));
    };
    let payload = after_colon.trim();
    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_string())
    };

    Ok(ArrayHeader {
        key,
        len,
        delimiter,
        fields,
        payload,
    })
}

fn find_unquoted_bracket(content: &str) -> Option<usize> {
    scan_unquoted(content, '[')
}

fn find_unquoted_brace(content: &str) -> Option<usize> {
    scan_unquoted(content, '}')
}

fn scan_unquoted(content: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == target && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}
