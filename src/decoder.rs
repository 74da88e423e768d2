//! TOON to JSON decoder.

use crate::common::PathExpansion;
use crate::error::DecodeError;
use crate::fold::expand_paths;
use crate::header::{is_bare_header, parse_header, ArrayHeader};
use crate::lexical::{parse_key, parse_token};
use crate::tokenize::{find_unquoted_colon, split_tokens};
use serde_json::{Map, Value};

/// Decoder configuration options
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Spaces per indentation level (default: 2)
    pub indent: usize,
    /// Enforce declared counts, indentation, and blank-line rules
    /// (default: true)
    pub strict: bool,
    /// Rebuild nested objects from dotted keys after decoding
    /// (default: off)
    pub expand_paths: PathExpansion,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            strict: true,
            expand_paths: PathExpansion::Off,
        }
    }
}

impl DecoderOptions {
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_expand_paths(mut self, expand_paths: PathExpansion) -> Self {
        self.expand_paths = expand_paths;
        self
    }
}

/// Decode TOON text to a JSON value. Empty input decodes to null.
pub fn decode(input: &str, options: &DecoderOptions) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(input, options)?;
    let value = decoder.decode_root()?;
    match options.expand_paths {
        PathExpansion::Safe => expand_paths(&value, options.strict),
        PathExpansion::Off => Ok(value),
    }
}

#[derive(Debug, Clone)]
struct Line {
    /// Trimmed payload; empty for blank lines.
    content: String,
    /// Leading whitespace width in characters.
    indent: usize,
    /// 1-based position in the raw input.
    number: usize,
    blank: bool,
}

struct Decoder<'a> {
    lines: Vec<Line>,
    options: &'a DecoderOptions,
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &str, options: &'a DecoderOptions) -> Result<Self, DecodeError> {
        let lines = prepare_lines(input, options)?;
        Ok(Self {
            lines,
            options,
            pos: 0,
        })
    }

    fn current(&self) -> Option<&Line> {
        self.lines.get(self.pos)
    }

    fn skip_blanks(&mut self) {
        while self.current().is_some_and(|l| l.blank) {
            self.pos += 1;
        }
    }

    /// Skip blanks inside an array body. In strict mode a blank followed by
    /// more body content is an error.
    fn skip_blanks_in_body(&mut self, value_indent: usize) -> Result<(), DecodeError> {
        let mut first_blank = None;
        while let Some(line) = self.current() {
            if !line.blank {
                break;
            }
            first_blank.get_or_insert(line.number);
            self.pos += 1;
        }
        if self.options.strict {
            if let (Some(blank), Some(line)) = (first_blank, self.current()) {
                if line.indent >= value_indent {
                    return Err(DecodeError::BlankInsideArray { line: blank });
                }
            }
        }
        Ok(())
    }

    /// Root classification: array header, single primitive line, or object.
    fn decode_root(&mut self) -> Result<Value, DecodeError> {
        self.skip_blanks();
        let Some(first) = self.current() else {
            return Ok(Value::Null);
        };
        let number = first.number;
        let indent = first.indent;
        let content = first.content.clone();

        if is_bare_header(&content) {
            let header = self.require_header(&content, number)?;
            self.pos += 1;
            return self.decode_array_body(&header, indent, number);
        }

        let non_blank = self.lines.iter().filter(|l| !l.blank).count();
        if find_unquoted_colon(&content).is_none() && non_blank == 1 {
            return parse_token(&content, number);
        }

        self.decode_object(indent)
    }

    /// Parse an object whose members sit at the expected indent.
    fn decode_object(&mut self, expected: usize) -> Result<Value, DecodeError> {
        let mut obj = Map::new();

        loop {
            self.skip_blanks();
            let Some(line) = self.current() else { break };
            if line.indent < expected {
                break;
            }
            if line.indent > expected {
                // stray deeper line not claimed by any child; skip
                self.pos += 1;
                continue;
            }
            let number = line.number;
            let content = line.content.clone();

            if let Some(result) = parse_header(&content, number) {
                let header = result?;
                let Some(key) = header.key.clone() else {
                    return Err(DecodeError::InvalidLine {
                        line: number,
                        content,
                    });
                };
                self.pos += 1;
                let value = self.decode_array_body(&header, expected, number)?;
                obj.insert(key, value);
                continue;
            }

            let Some(colon) = find_unquoted_colon(&content) else {
                return Err(DecodeError::InvalidLine {
                    line: number,
                    content,
                });
            };
            let key = parse_key(content[..colon].trim(), number)?;
            let value_part = content[colon + 1..].trim().to_string();
            self.pos += 1;

            let value = if value_part.is_empty() {
                self.decode_block_value(expected)?
            } else {
                parse_token(&value_part, number)?
            };
            obj.insert(key, value);
        }

        Ok(Value::Object(obj))
    }

    /// Value of a `key:` line: a deeper bare header is an array, deeper
    /// lines are a nested object, nothing deeper is null.
    fn decode_block_value(&mut self, parent_indent: usize) -> Result<Value, DecodeError> {
        self.skip_blanks();
        match self.current() {
            Some(line) if line.indent > parent_indent => {
                if is_bare_header(&line.content) {
                    let number = line.number;
                    let indent = line.indent;
                    let content = line.content.clone();
                    let header = self.require_header(&content, number)?;
                    self.pos += 1;
                    self.decode_array_body(&header, indent, number)
                } else {
                    self.decode_object(parent_indent + self.options.indent)
                }
            }
            _ => Ok(Value::Null),
        }
    }

    /// Parse an array body given its header: inline payload, tabular rows,
    /// or expanded elements.
    fn decode_array_body(
        &mut self,
        header: &ArrayHeader,
        header_indent: usize,
        header_line: usize,
    ) -> Result<Value, DecodeError> {
        if let Some(payload) = &header.payload {
            let tokens = split_tokens(payload, header.delimiter);
            if self.options.strict && tokens.len() != header.len {
                return Err(DecodeError::CountMismatch {
                    line: header_line,
                    expected: header.len,
                    actual: tokens.len(),
                });
            }
            let items = tokens
                .iter()
                .map(|t| parse_token(t, header_line))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Value::Array(items));
        }

        let value_indent = header_indent + self.options.indent;
        match &header.fields {
            Some(fields) => {
                self.decode_tabular_rows(header, fields, value_indent, header_line)
            }
            None => self.decode_expanded(header, value_indent, header_line),
        }
    }

    fn decode_tabular_rows(
        &mut self,
        header: &ArrayHeader,
        fields: &[String],
        value_indent: usize,
        header_line: usize,
    ) -> Result<Value, DecodeError> {
        let mut rows = Vec::new();

        loop {
            self.skip_blanks_in_body(value_indent)?;
            let Some(line) = self.current() else { break };
            if line.indent != value_indent {
                break;
            }
            if rows.len() == header.len {
                if self.options.strict {
                    let extra = self.count_rows_ahead(value_indent);
                    return Err(DecodeError::CountMismatch {
                        line: line.number,
                        expected: header.len,
                        actual: header.len + extra,
                    });
                }
                break;
            }
            let number = line.number;
            let tokens = split_tokens(&line.content, header.delimiter);
            if self.options.strict && tokens.len() != fields.len() {
                return Err(DecodeError::CountMismatch {
                    line: number,
                    expected: fields.len(),
                    actual: tokens.len(),
                });
            }
            let mut row = Map::new();
            for (field, token) in fields.iter().zip(&tokens) {
                row.insert(field.clone(), parse_token(token, number)?);
            }
            rows.push(Value::Object(row));
            self.pos += 1;
        }

        if self.options.strict && rows.len() != header.len {
            return Err(DecodeError::CountMismatch {
                line: header_line,
                expected: header.len,
                actual: rows.len(),
            });
        }
        Ok(Value::Array(rows))
    }

    fn count_rows_ahead(&self, value_indent: usize) -> usize {
        self.lines[self.pos..]
            .iter()
            .take_while(|l| !l.blank && l.indent == value_indent)
            .count()
    }

    /// Expanded non-tabular body. Single-line `key: value` pairs at the
    /// value indent accumulate into one object element; a repeated key,
    /// a value-only block, a primitive, or a bare header closes it.
    fn decode_expanded(
        &mut self,
        header: &ArrayHeader,
        value_indent: usize,
        header_line: usize,
    ) -> Result<Value, DecodeError> {
        let mut items: Vec<Value> = Vec::new();
        let mut acc: Option<Map<String, Value>> = None;

        fn flush(acc: &mut Option<Map<String, Value>>, items: &mut Vec<Value>) {
            if let Some(done) = acc.take() {
                items.push(Value::Object(done));
            }
        }

        loop {
            self.skip_blanks_in_body(value_indent)?;
            let Some(line) = self.current() else { break };
            if line.indent < value_indent {
                break;
            }
            if line.indent > value_indent {
                // stray deeper line not claimed by any element; skip
                self.pos += 1;
                continue;
            }
            let number = line.number;
            let content = line.content.clone();

            if is_bare_header(&content) {
                flush(&mut acc, &mut items);
                let nested = self.require_header(&content, number)?;
                self.pos += 1;
                items.push(self.decode_array_body(&nested, value_indent, number)?);
                continue;
            }

            if let Some(result) = parse_header(&content, number) {
                // keyed header: an array-valued field of an object element
                let nested = result?;
                let Some(key) = nested.key.clone() else {
                    return Err(DecodeError::InvalidLine {
                        line: number,
                        content,
                    });
                };
                if acc.as_ref().is_some_and(|m| m.contains_key(&key)) {
                    flush(&mut acc, &mut items);
                }
                self.pos += 1;
                let value = self.decode_array_body(&nested, value_indent, number)?;
                acc.get_or_insert_with(Map::new).insert(key, value);
                continue;
            }

            if let Some(colon) = find_unquoted_colon(&content) {
                let key = parse_key(content[..colon].trim(), number)?;
                let value_part = content[colon + 1..].trim().to_string();
                self.pos += 1;
                if value_part.is_empty() {
                    // value-only block starts a fresh element
                    flush(&mut acc, &mut items);
                    let value = self.decode_block_value(value_indent)?;
                    acc.get_or_insert_with(Map::new).insert(key, value);
                } else {
                    if acc.as_ref().is_some_and(|m| m.contains_key(&key)) {
                        flush(&mut acc, &mut items);
                    }
                    let value = parse_token(&value_part, number)?;
                    acc.get_or_insert_with(Map::new).insert(key, value);
                }
                continue;
            }

            flush(&mut acc, &mut items);
            self.pos += 1;
            items.push(parse_token(&content, number)?);
        }
        flush(&mut acc, &mut items);

        if self.options.strict && items.len() != header.len {
            return Err(DecodeError::CountMismatch {
                line: header_line,
                expected: header.len,
                actual: items.len(),
            });
        }
        Ok(Value::Array(items))
    }

    fn require_header(&self, content: &str, number: usize) -> Result<ArrayHeader, DecodeError> {
        match parse_header(content, number) {
            Some(result) => result,
            None => Err(DecodeError::invalid_header(number, "missing colon")),
        }
    }
}

/// Split the input into lines, stripping `\r` and measuring indentation.
/// Strict mode rejects tabs in leading whitespace and widths that are not
/// a multiple of the indent unit.
fn prepare_lines(input: &str, options: &DecoderOptions) -> Result<Vec<Line>, DecodeError> {
    let mut lines = Vec::new();
    for (i, raw) in input.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let number = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push(Line {
                content: String::new(),
                indent: 0,
                number,
                blank: true,
            });
            continue;
        }
        let leading: Vec<char> = raw.chars().take_while(|c| c.is_whitespace()).collect();
        if options.strict {
            if leading.contains(&'\t') {
                return Err(DecodeError::indentation(number, "tab in leading whitespace"));
            }
            if leading.len() % options.indent != 0 {
                return Err(DecodeError::indentation(
                    number,
                    format!("indent of {} is not a multiple of {}", leading.len(), options.indent),
                ));
            }
        }
        lines.push(Line {
            content: trimmed.to_string(),
            indent: leading.len(),
            number,
            blank: false,
        });
    }
    Ok(lines)
}
