use crate::foundation::error::SceneResult;

/// Wire shape of an apply outcome: `{"success": true}` or `{"error": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ApplyResponse {
    /// The change was committed.
    Success {
        /// Always `true`.
        success: bool,
    },
    /// The change was rejected or failed; the document is unchanged unless the message reports
    /// corruption.
    Error {
        /// Human-readable error message.
        error: String,
    },
}

impl ApplyResponse {
    /// True for [`ApplyResponse::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { success: true })
    }
}

impl<T> From<SceneResult<T>> for ApplyResponse {
    fn from(result: SceneResult<T>) -> Self {
        match result {
            Ok(_) => Self::Success { success: true },
            Err(err) => Self::Error {
                error: err.to_string(),
            },
        }
    }
}
