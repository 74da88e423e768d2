//! # toon_codec
//!
//! A bidirectional codec between JSON values and TOON, a line-oriented,
//! indentation-structured notation with explicit array headers, tabular
//! arrays, and minimal quoting.
//!
//! Encoding walks a [`serde_json::Value`] and picks a form per node:
//! objects become `key: value` lines, uniform object arrays become a
//! header plus delimited rows, primitive arrays stay inline while they
//! fit, and everything else expands over indented lines. Decoding
//! reverses the process, optionally enforcing declared counts and
//! indentation in strict mode.
//!
//! ## Example
//!
//! ```rust
//! use toon_codec::{encode, decode, EncoderOptions, DecoderOptions};
//! use serde_json::json;
//!
//! let data = json!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["admin", "user"]
//! });
//!
//! let toon = encode(&data, &EncoderOptions::default());
//! assert_eq!(toon, "name: Alice\nage: 30\ntags[2]: admin, user");
//!
//! let decoded = decode(&toon, &DecoderOptions::default()).unwrap();
//! assert_eq!(data, decoded);
//! ```
//!
//! Key folding collapses single-key object chains into dotted paths on
//! encode; path expansion reverses it on decode:
//!
//! ```rust
//! use toon_codec::{encode, decode, EncoderOptions, DecoderOptions, KeyFolding, PathExpansion};
//! use serde_json::json;
//!
//! let data = json!({"a": {"b": {"c": 1}}});
//! let opts = EncoderOptions::default().with_key_folding(KeyFolding::Safe);
//! let toon = encode(&data, &opts);
//! assert_eq!(toon, "a.b.c: 1");
//!
//! let opts = DecoderOptions::default().with_expand_paths(PathExpansion::Safe);
//! assert_eq!(decode(&toon, &opts).unwrap(), data);
//! ```

mod common;
mod decoder;
mod encoder;
mod error;
mod fold;
mod header;
mod lexical;
mod normalize;
mod tokenize;

// Re-export public API
pub use common::{Delimiter, KeyFolding, PathExpansion};
pub use decoder::{decode, DecoderOptions};
pub use encoder::{encode, EncoderOptions};
pub use error::DecodeError;
pub use normalize::normalize;
