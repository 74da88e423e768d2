//! Shared types used by both encoder and decoder.

/// Delimiter for inline array values, tabular rows, and header field lists.
///
/// Bound once per document on encode; carried per array through headers on
/// decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the character representation
    pub(crate) fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// Returns the header symbol (empty for comma, actual char for tab/pipe)
    pub(crate) fn header_symbol(&self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// Separator emitted between values. Comma gets a trailing space so
    /// inline payloads and rows stay readable; the tokenizer consumes the
    /// pair as one boundary.
    pub(crate) fn separator(&self) -> &'static str {
        match self {
            Delimiter::Comma => ", ",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }
}

/// Key folding mode: collapse single-key object chains into dotted paths
/// before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFolding {
    /// No key folding
    #[default]
    Off,
    /// Fold only chains whose every segment is a plain identifier
    Safe,
}

/// Path expansion mode: rebuild nested objects from dotted keys after
/// decoding. The inverse of [`KeyFolding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathExpansion {
    /// No path expansion
    #[default]
    Off,
    /// Expand only keys whose every dot-separated segment is a plain
    /// identifier
    Safe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_symbols() {
        assert_eq!(Delimiter::Comma.header_symbol(), "");
        assert_eq!(Delimiter::Tab.header_symbol(), "\t");
        assert_eq!(Delimiter::Pipe.header_symbol(), "|");
    }

    #[test]
    fn comma_separator_has_trailing_space() {
        assert_eq!(Delimiter::Comma.separator(), ", ");
        assert_eq!(Delimiter::Pipe.separator(), "|");
    }
}
