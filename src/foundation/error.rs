use std::path::PathBuf;

/// Convenience result type used across scenewright.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Candidate source text failed the syntax check. Nothing was written.
    #[error("validation error: {}", .errors.join("; "))]
    Validation {
        /// Human-readable messages in source order.
        errors: Vec<String>,
    },

    /// The scene document does not contain exactly one mutable region.
    #[error("region not found: expected exactly one scene body, found {matches}")]
    RegionNotFound {
        /// Number of candidate regions that matched.
        matches: usize,
    },

    /// Template lookup or expansion failed before any mutation was attempted.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Storage operation failed. The document was rolled back when applicable.
    #[error("io error: {op} '{}': {source}", .path.display())]
    Io {
        /// Short name of the failed operation (`read`, `write`, `backup`, ...).
        op: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A failed write could not be rolled back; the document may be inconsistent.
    #[error(
        "corruption: rollback of '{}' failed after write error ({write_error}): {restore_error}",
        .path.display()
    )]
    Corruption {
        /// Document path.
        path: PathBuf,
        /// The error that triggered the rollback.
        write_error: String,
        /// The error raised while restoring from backup.
        restore_error: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Validation`] value.
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    /// Build a [`SceneError::RegionNotFound`] value.
    pub fn region_not_found(matches: usize) -> Self {
        Self::RegionNotFound { matches }
    }

    /// Build a [`SceneError::Io`] value.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for the one unrecoverable condition: a rollback that did not complete.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Corruption { .. })
    }
}

/// Errors raised by template lookup and expansion.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A declared variable has no supplied value.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Variable name.
        name: String,
    },

    /// A supplied value does not match the declared variable kind.
    #[error("variable {name} must be a {expected}, got {found}")]
    TypeMismatch {
        /// Variable name.
        name: String,
        /// Declared kind.
        expected: &'static str,
        /// Kind of the supplied value.
        found: &'static str,
    },

    /// No template with this id is registered.
    #[error("template {0} not found")]
    NotFound(String),

    /// A template with this id is already registered.
    #[error("duplicate template id '{0}'")]
    DuplicateTemplate(String),

    /// A template record is malformed (for example, it has an empty id).
    #[error("invalid template '{template}': {reason}")]
    InvalidTemplate {
        /// Template id (or name, for inline templates).
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A template declares the same variable twice.
    #[error("template '{template}' declares variable '{name}' more than once")]
    DuplicateVariable {
        /// Template id (or name, for inline templates).
        template: String,
        /// Variable name.
        name: String,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
