use crate::foundation::error::{SceneError, SceneResult};
use crate::syntax::parse::{check_body, scene_bodies};

/// Largest source accepted for validation; larger inputs fail closed.
pub const MAX_SOURCE_BYTES: usize = 4 * 1024 * 1024;

/// Outcome of a syntax check.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Validation {
    /// `true` when the source is syntactically well-formed.
    pub ok: bool,
    /// Human-readable messages (`line:column: message`), empty when `ok`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Validation {
    fn valid() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    fn invalid(errors: Vec<String>) -> Self {
        Self { ok: false, errors }
    }

    /// Convert into a result, mapping failure to [`SceneError::Validation`].
    pub fn into_result(self) -> SceneResult<()> {
        if self.ok {
            Ok(())
        } else {
            Err(SceneError::validation(self.errors))
        }
    }
}

fn oversized(source: &str) -> Option<Validation> {
    (source.len() > MAX_SOURCE_BYTES).then(|| {
        Validation::invalid(vec![format!(
            "source is {} bytes; at most {MAX_SOURCE_BYTES} bytes are accepted",
            source.len()
        )])
    })
}

/// Check that `source` parses as the body of a scene generator.
///
/// The code is parsed as TSX statements inside a generator function, so `yield` is legal and
/// module syntax (`import`, `export`) is not. Name resolution and types are not checked:
/// unknown identifiers pass. Empty input is valid. Parser failures, including an internal
/// panic, are reported as errors rather than propagated.
pub fn validate(source: &str) -> Validation {
    if let Some(rejected) = oversized(source) {
        return rejected;
    }
    match check_body(source) {
        Ok(()) => Validation::valid(),
        Err(errors) => {
            tracing::debug!(count = errors.len(), "source rejected by syntax check");
            Validation::invalid(errors.iter().map(|e| e.render(source)).collect())
        }
    }
}

/// Check that `source` parses as a complete TSX module.
///
/// Imports and exports are allowed at the top level only. Whether the module contains a scene
/// region is not checked here; see [`SceneDocument::parse`](crate::SceneDocument::parse).
pub fn validate_document(source: &str) -> Validation {
    if let Some(rejected) = oversized(source) {
        return rejected;
    }
    match scene_bodies(source, crate::SCENE_FACTORY) {
        Ok(_) => Validation::valid(),
        Err(errors) => {
            tracing::debug!(count = errors.len(), "document rejected by syntax check");
            Validation::invalid(errors.iter().map(|e| e.render(source)).collect())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/syntax/validate.rs"]
mod tests;
