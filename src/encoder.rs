//! JSON to TOON encoder.

use crate::common::{Delimiter, KeyFolding};
use crate::fold::fold_keys;
use crate::lexical::{canonical_number, format_key, needs_quoting, quote_and_escape};
use crate::normalize::normalize;
use serde_json::{Map, Value};

/// Encoder configuration options
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Spaces per indentation level (default: 2)
    pub indent: usize,
    /// Document-wide delimiter for payloads, rows, and quoting decisions
    /// (default: comma)
    pub delimiter: Delimiter,
    /// Collapse single-key object chains into dotted keys (default: off)
    pub key_folding: KeyFolding,
    /// Maximum segments per folded key; `usize::MAX` is unbounded
    pub flatten_depth: usize,
    /// Column budget below which a primitive array stays on one line
    /// (default: 80)
    pub inline_budget: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            delimiter: Delimiter::Comma,
            key_folding: KeyFolding::Off,
            flatten_depth: usize::MAX,
            inline_budget: 80,
        }
    }
}

impl EncoderOptions {
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_key_folding(mut self, key_folding: KeyFolding) -> Self {
        self.key_folding = key_folding;
        self
    }

    #[must_use]
    pub fn with_flatten_depth(mut self, flatten_depth: usize) -> Self {
        self.flatten_depth = flatten_depth;
        self
    }

    #[must_use]
    pub fn with_inline_budget(mut self, inline_budget: usize) -> Self {
        self.inline_budget = inline_budget;
        self
    }
}

/// Encode a JSON value to TOON text. Lines are joined with `\n` and the
/// output carries no trailing newline. Cannot fail: the value is
/// normalized first.
pub fn encode(value: &Value, options: &EncoderOptions) -> String {
    let normalized = normalize(value);
    let value = match options.key_folding {
        KeyFolding::Safe => fold_keys(&normalized, options.flatten_depth),
        KeyFolding::Off => normalized,
    };
    let mut encoder = Encoder::new(options);
    encoder.encode_root(&value);
    encoder.lines.join("\n")
}

struct Encoder<'a> {
    options: &'a EncoderOptions,
    lines: Vec<String>,
}

impl<'a> Encoder<'a> {
    fn new(options: &'a EncoderOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
        }
    }

    fn push_line(&mut self, depth: usize, content: &str) {
        let mut line = " ".repeat(depth * self.options.indent);
        line.push_str(content);
        self.lines.push(line);
    }

    fn encode_root(&mut self, value: &Value) {
        match value {
            Value::Object(obj) if obj.is_empty() => {}
            Value::Object(obj) => self.encode_object(obj, 0),
            Value::Array(arr) => self.encode_array(None, arr, 0),
            _ => {
                let token = self.primitive_token(value);
                self.push_line(0, &token);
            }
        }
    }

    fn encode_object(&mut self, obj: &Map<String, Value>, depth: usize) {
        for (key, value) in obj {
            match value {
                Value::Object(nested) if nested.is_empty() => {}
                Value::Object(nested) => {
                    self.push_line(depth, &format!("{}:", format_key(key)));
                    self.encode_object(nested, depth + 1);
                }
                Value::Array(arr) => self.encode_array(Some(key), arr, depth),
                _ => {
                    let token = self.primitive_token(value);
                    self.push_line(depth, &format!("{}: {}", format_key(key), token));
                }
            }
        }
    }

    /// Array form selection: empty, tabular, inline/expanded primitives,
    /// or mixed, in that order.
    fn encode_array(&mut self, key: Option<&str>, arr: &[Value], depth: usize) {
        let delim = self.options.delimiter;

        if arr.is_empty() {
            let header = self.header_string(key, 0, None);
            self.push_line(depth, &header);
            return;
        }

        if let Some(fields) = detect_tabular(arr) {
            let header = self.header_string(key, arr.len(), Some(&fields));
            self.push_line(depth, &header);
            for element in arr {
                if let Value::Object(row) = element {
                    let cells: Vec<String> = fields
                        .iter()
                        .map(|f| {
                            row.get(f)
                                .map(|v| self.primitive_token(v))
                                .unwrap_or_default()
                        })
                        .collect();
                    self.push_line(depth + 1, &cells.join(delim.separator()));
                }
            }
            return;
        }

        if arr.iter().all(is_primitive) {
            let header = self.header_string(key, arr.len(), None);
            let tokens: Vec<String> = arr.iter().map(|v| self.primitive_token(v)).collect();
            let payload = tokens.join(delim.separator());
            let candidate = format!("{} {}", header, payload);
            let width = depth * self.options.indent + candidate.chars().count();
            if width < self.options.inline_budget && !candidate.contains('\n') {
                self.push_line(depth, &candidate);
            } else {
                self.push_line(depth, &header);
                for token in tokens {
                    self.push_line(depth + 1, &token);
                }
            }
            return;
        }

        // Elements that would emit no lines are left out of the declared
        // count as well, so the header always matches the body.
        let emitted: Vec<&Value> = arr.iter().filter(|v| !element_is_blank(v)).collect();
        let header = self.header_string(key, emitted.len(), None);
        self.push_line(depth, &header);
        for element in emitted {
            match element {
                Value::Object(obj) => self.encode_object(obj, depth + 1),
                Value::Array(inner) => self.encode_array(None, inner, depth + 1),
                _ => {
                    let token = self.primitive_token(element);
                    self.push_line(depth + 1, &token);
                }
            }
        }
    }

    fn header_string(&self, key: Option<&str>, len: usize, fields: Option<&[String]>) -> String {
        let delim = self.options.delimiter;
        let mut header = match key {
            Some(key) => format_key(key),
            None => String::new(),
        };
        header.push('[');
        header.push_str(&len.to_string());
        header.push_str(delim.header_symbol());
        header.push(']');
        if let Some(fields) = fields {
            header.push('{');
            let names: Vec<String> = fields.iter().map(|f| format_key(f)).collect();
            header.push_str(&names.join(delim.separator()));
            header.push('}');
        }
        header.push(':');
        header
    }

    fn primitive_token(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => canonical_number(n),
            Value::String(s) => {
                if needs_quoting(s, self.options.delimiter) {
                    quote_and_escape(s)
                } else {
                    s.clone()
                }
            }
            Value::Array(_) | Value::Object(_) => String::new(),
        }
    }
}

fn is_primitive(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// Whether an array element would contribute no lines: an object whose
/// every member value is an empty object (`encode_object` skips those),
/// including the empty object itself.
fn element_is_blank(value: &Value) -> bool {
    match value {
        Value::Object(obj) => obj
            .values()
            .all(|v| matches!(v, Value::Object(inner) if inner.is_empty())),
        _ => false,
    }
}

/// Uniform-object test: every element a non-empty object over the same key
/// set with only primitive values. Returns the sorted field list.
fn detect_tabular(arr: &[Value]) -> Option<Vec<String>> {
    if arr.is_empty() {
        return None;
    }
    let first = arr.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    let mut fields: Vec<String> = first.keys().cloned().collect();
    fields.sort_unstable();

    for element in arr {
        let obj = element.as_object()?;
        if obj.len() != fields.len() {
            return None;
        }
        for field in &fields {
            if !is_primitive(obj.get(field)?) {
                return None;
            }
        }
    }
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enc(value: &Value) -> String {
        encode(value, &EncoderOptions::default())
    }

    #[test]
    fn empty_root_object() {
        assert_eq!(enc(&json!({})), "");
    }

    #[test]
    fn flat_object() {
        let data = json!({"id": 123, "name": "Ada", "active": true});
        assert_eq!(enc(&data), "id: 123\nname: Ada\nactive: true");
    }

    #[test]
    fn nested_object() {
        let data = json!({"user": {"name": "Bob", "id": 123}});
        assert_eq!(enc(&data), "user:\n  name: Bob\n  id: 123");
    }

    #[test]
    fn empty_nested_object_dropped() {
        let data = json!({"a": {}, "b": 1});
        assert_eq!(enc(&data), "b: 1");
    }

    #[test]
    fn inline_primitive_array() {
        let data = json!({"tags": ["admin", "ops", "dev"]});
        assert_eq!(enc(&data), "tags[3]: admin, ops, dev");
    }

    #[test]
    fn mixed_type_primitives_stay_inline() {
        let data = json!({"items": [1, "text", true, null]});
        assert_eq!(enc(&data), "items[4]: 1, text, true, null");
    }

    #[test]
    fn long_primitive_array_expands() {
        let words: Vec<Value> = (0..12)
            .map(|i| Value::String(format!("entry_number_{}", i)))
            .collect();
        let data = json!({ "words": words });
        let out = enc(&data);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("words[12]:"));
        assert_eq!(lines.next(), Some("  entry_number_0"));
        assert_eq!(out.lines().count(), 13);
    }

    #[test]
    fn inline_budget_is_configurable() {
        let data = json!({"tags": ["admin", "ops", "dev"]});
        let opts = EncoderOptions::default().with_inline_budget(10);
        assert_eq!(
            encode(&data, &opts),
            "tags[3]:\n  admin\n  ops\n  dev"
        );
    }

    #[test]
    fn empty_array() {
        assert_eq!(enc(&json!({"items": []})), "items[0]:");
        assert_eq!(enc(&json!([])), "[0]:");
    }

    #[test]
    fn tabular_array_sorts_fields() {
        let data = json!([
            {"sku": "A1", "qty": 2, "price": 9.99},
            {"sku": "B2", "qty": 1, "price": 14.5}
        ]);
        assert_eq!(
            enc(&data),
            "[2]{price, qty, sku}:\n  9.99, 2, A1\n  14.5, 1, B2"
        );
    }

    #[test]
    fn keyed_tabular_array() {
        let data = json!({"users": [
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"}
        ]});
        assert_eq!(enc(&data), "users[2]{id, name}:\n  1, Alice\n  2, Bob");
    }

    #[test]
    fn differing_key_sets_are_not_tabular() {
        let data = json!({"rows": [{"a": 1}, {"b": 2}]});
        assert_eq!(enc(&data), "rows[2]:\n  a: 1\n  b: 2");
    }

    #[test]
    fn object_values_break_tabular() {
        let data = json!({"rows": [{"a": {"x": 1}}, {"a": {"x": 2}}]});
        assert_eq!(enc(&data), "rows[2]:\n  a:\n    x: 1\n  a:\n    x: 2");
    }

    #[test]
    fn array_of_empty_objects_is_not_tabular() {
        // Blank elements fall out of the declared count too.
        let data = json!({"rows": [{}, {}]});
        assert_eq!(enc(&data), "rows[0]:");
    }

    #[test]
    fn blank_elements_excluded_from_header_count() {
        let data = json!({"rows": [{}, {"a": 1}, {}, 7]});
        assert_eq!(enc(&data), "rows[2]:\n  a: 1\n  7");

        // An object of only empty-object members emits nothing either.
        let data = json!({"rows": [{"a": {}}, {"b": 1}]});
        assert_eq!(enc(&data), "rows[1]:\n  b: 1");
    }

    #[test]
    fn nested_arrays() {
        let data = json!({"matrix": [[1, 2], [3, 4]]});
        assert_eq!(enc(&data), "matrix[2]:\n  [2]: 1, 2\n  [2]: 3, 4");
    }

    #[test]
    fn root_primitive() {
        assert_eq!(enc(&json!(42)), "42");
        assert_eq!(enc(&json!("hello world")), "hello world");
        assert_eq!(enc(&json!(null)), "null");
    }

    #[test]
    fn quoting_in_values_and_rows() {
        let data = json!({"url": "http://example.com:8080"});
        assert_eq!(enc(&data), "url: \"http://example.com:8080\"");

        let data = json!({"tags": ["a,b", "c"]});
        assert_eq!(enc(&data), "tags[2]: \"a,b\", c");

        let data = json!({"values": ["true", "007", "-"]});
        assert_eq!(enc(&data), "values[3]: \"true\", \"007\", \"-\"");
    }

    #[test]
    fn keys_needing_quotes() {
        let data = json!({"order id": 7, "2nd": "x"});
        assert_eq!(enc(&data), "\"order id\": 7\n\"2nd\": x");
    }

    #[test]
    fn tab_delimiter_document() {
        let data = json!({"items": [
            {"id": 1, "name": "A"},
            {"id": 2, "name": "B"}
        ]});
        let opts = EncoderOptions::default().with_delimiter(Delimiter::Tab);
        assert_eq!(encode(&data, &opts), "items[2\t]{id\tname}:\n  1\tA\n  2\tB");
    }

    #[test]
    fn pipe_delimiter_document() {
        let data = json!({"tags": ["a", "b", "c"]});
        let opts = EncoderOptions::default().with_delimiter(Delimiter::Pipe);
        assert_eq!(encode(&data, &opts), "tags[3|]: a|b|c");
    }

    #[test]
    fn key_folding_safe() {
        let data = json!({"a": {"b": {"c": {"value": 42}}}});
        let opts = EncoderOptions::default().with_key_folding(KeyFolding::Safe);
        assert_eq!(encode(&data, &opts), "a.b.c.value: 42");
    }

    #[test]
    fn number_canonical_forms() {
        let data = json!({"int": 42, "float": 3.14, "neg": -100, "zero": -0.0});
        assert_eq!(enc(&data), "int: 42\nfloat: 3.14\nneg: -100\nzero: 0");
    }

    #[test]
    fn escape_sequences_in_strings() {
        let data = json!({"text": "Line1\nLine2\tTab"});
        assert_eq!(enc(&data), "text: \"Line1\\nLine2\\tTab\"");
    }
}
