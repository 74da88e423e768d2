//! Lexical rules shared by encoder and decoder: number canonicalization,
//! string quoting, escaping, key and identifier syntax, and token
//! classification.

use crate::common::Delimiter;
use crate::error::DecodeError;
use serde_json::Value;

/// Canonical text form of a finite number: negative zero renders as `0`,
/// no exponent notation, no trailing fraction zeros, no lone `.`.
pub(crate) fn canonical_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        if f == 0.0 {
            return "0".to_string();
        }
        // std float Display is already canonical: plain fixed-point with
        // the shortest round-tripping fraction.
        format!("{}", f)
    } else {
        n.to_string()
    }
}

/// Matches the numeric lexeme `-?\d+(\.\d+)?([eE][+-]?\d+)?` in full.
pub(crate) fn is_numeric_lexeme(s: &str) -> bool {
    let mut chars = s.chars().peekable();

    if chars.peek() == Some(&'-') {
        chars.next();
    }
    let mut digits = 0;
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        digits += 1;
    }
    if digits == 0 {
        return false;
    }

    if chars.peek() == Some(&'.') {
        chars.next();
        let mut frac = 0;
        while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            chars.next();
            frac += 1;
        }
        if frac == 0 {
            return false;
        }
    }

    if matches!(chars.peek(), Some('e') | Some('E')) {
        chars.next();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut exp = 0;
        while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            chars.next();
            exp += 1;
        }
        if exp == 0 {
            return false;
        }
    }

    chars.next().is_none()
}

/// Matches `0\d+`: a leading zero followed by more digits.
fn has_leading_zero(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0') && s[1..].chars().all(|c| c.is_ascii_digit())
}

/// Whether a string value must be quoted to survive round-tripping with
/// the given active delimiter.
pub(crate) fn needs_quoting(s: &str, delim: Delimiter) -> bool {
    if s.is_empty() {
        return true;
    }
    let first = s.chars().next().unwrap_or_default();
    let last = s.chars().next_back().unwrap_or_default();
    if first.is_ascii_whitespace() || last.is_ascii_whitespace() {
        return true;
    }
    if s == "true" || s == "false" || s == "null" {
        return true;
    }
    if is_numeric_lexeme(s) || has_leading_zero(s) {
        return true;
    }
    if s == "-" || (first == '-' && !s[1..].starts_with(|c: char| c.is_ascii_digit())) {
        return true;
    }
    s.chars().any(|c| {
        matches!(c, ':' | '"' | '\\' | '[' | ']' | '{' | '}' | '\n' | '\r' | '\t')
            || c == delim.as_char()
    })
}

/// Escape `\ " \n \r \t` without adding surrounding quotes.
pub(crate) fn escape_str(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}

/// Wrap a string in double quotes, escaping as needed.
pub(crate) fn quote_and_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    result.push_str(&escape_str(s));
    result.push('"');
    result
}

/// Reverse [`escape_str`] on the inside of a quoted span. The escape set
/// is closed: any other `\X` and a trailing backslash are errors.
pub(crate) fn unescape(inner: &str, line: usize) -> Result<String, DecodeError> {
    if !inner.contains('\\') {
        return Ok(inner.to_string());
    }
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other) => {
                return Err(DecodeError::InvalidEscape {
                    line,
                    sequence: format!("\\{}", other),
                })
            }
            None => {
                return Err(DecodeError::InvalidEscape {
                    line,
                    sequence: "\\".to_string(),
                })
            }
        }
    }
    Ok(result)
}

/// Emit a key, quoted unless it matches `[A-Za-z_][A-Za-z0-9_.]*`.
pub(crate) fn format_key(key: &str) -> String {
    let mut chars = key.chars();
    let bare = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        None => false,
    };
    if bare {
        key.to_string()
    } else {
        quote_and_escape(key)
    }
}

/// A dot-separable key segment: `[A-Za-z_][A-Za-z0-9_]*`. Stricter than
/// the bare-key syntax, which also admits dots.
pub(crate) fn is_identifier_segment(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Parse a key token: a quoted key is unescaped, anything else is literal.
pub(crate) fn parse_key(token: &str, line: usize) -> Result<String, DecodeError> {
    match quoted_inner(token) {
        Some(inner) => unescape(inner, line),
        None => Ok(token.to_string()),
    }
}

/// Classify one trimmed token: quoted string, `true`/`false`/`null`,
/// numeric lexeme, or raw string.
pub(crate) fn parse_token(token: &str, line: usize) -> Result<Value, DecodeError> {
    if let Some(inner) = quoted_inner(token) {
        return Ok(Value::String(unescape(inner, line)?));
    }
    match token {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }
    if is_numeric_lexeme(token) {
        if let Some(n) = parse_number(token) {
            return Ok(n);
        }
    }
    Ok(Value::String(token.to_string()))
}

fn quoted_inner(token: &str) -> Option<&str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Numeric lexeme to value. Integral lexemes in range stay integers,
/// everything else becomes a double.
fn parse_number(s: &str) -> Option<Value> {
    if !s.contains(['.', 'e', 'E']) {
        if let Ok(i) = s.parse::<i64>() {
            return Some(Value::Number(i.into()));
        }
        if let Ok(u) = s.parse::<u64>() {
            return Some(Value::Number(u.into()));
        }
    }
    let f = s.parse::<f64>().ok()?;
    serde_json::Number::from_f64(f).map(Value::Number)
}
