use std::ops::Range;

use crate::foundation::error::{SceneError, SceneResult};
use crate::syntax::parse::scene_bodies;

/// Callee whose generator body is the mutable region of a scene document.
pub const SCENE_FACTORY: &str = "makeScene2D";

/// A parsed scene document with its single mutable region located.
///
/// The region is the body of the generator passed to [`SCENE_FACTORY`], found on the parsed
/// syntax tree rather than in raw text, so string literals and comments that mention the
/// factory never match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneDocument {
    text: String,
    body: Range<usize>,
}

impl SceneDocument {
    /// Parse `text` and locate its mutable region.
    ///
    /// Fails with [`SceneError::Validation`] if the text does not parse as a TSX module, and with
    /// [`SceneError::RegionNotFound`] unless exactly one scene body is present.
    pub fn parse(text: impl Into<String>) -> SceneResult<Self> {
        let text = text.into();
        let bodies = scene_bodies(&text, SCENE_FACTORY).map_err(|errors| {
            SceneError::validation(errors.iter().map(|e| e.render(&text)).collect())
        })?;
        match bodies.as_slice() {
            [body] => Ok(Self {
                body: body.clone(),
                text,
            }),
            _ => Err(SceneError::region_not_found(bodies.len())),
        }
    }

    /// Full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the document, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Byte range of the region between the body braces.
    pub fn region_range(&self) -> Range<usize> {
        self.body.clone()
    }

    /// Region content without the single framing newline on each side.
    pub fn region(&self) -> &str {
        let inner = &self.text[self.body.clone()];
        let inner = inner.strip_prefix('\n').unwrap_or(inner);
        inner.strip_suffix('\n').unwrap_or(inner)
    }

    /// Document text with the region replaced by `code`. Boilerplate is kept byte-for-byte.
    pub fn with_region(&self, code: &str) -> String {
        let framed = frame_body(code);
        let mut out =
            String::with_capacity(self.text.len() - self.body.len() + framed.len());
        out.push_str(&self.text[..self.body.start]);
        out.push_str(&framed);
        out.push_str(&self.text[self.body.end..]);
        out
    }
}

/// Region text as written between the body braces: the code on its own lines, or a single
/// newline when the code is blank.
pub(crate) fn frame_body(code: &str) -> String {
    if code.trim().is_empty() {
        return "\n".to_string();
    }
    format!("\n{}\n", code.trim_end_matches(['\n', '\r']))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
