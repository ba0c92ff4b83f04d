//! Syntax checks for scene source text.
//!
//! Source is parsed with `oxc_parser` in TSX mode, followed by `oxc_semantic`'s syntax checks.
//! Diagnostics are reported as `line:column: message` strings. Names and types are not
//! resolved.

pub(crate) mod error;
pub(crate) mod parse;
pub(crate) mod validate;
