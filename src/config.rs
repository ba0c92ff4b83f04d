use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::foundation::error::{SceneError, SceneResult};
use crate::mutate::mutator::DEFAULT_BACKUP_SUFFIX;
use crate::scene::boilerplate::SceneBoilerplate;

/// Engine settings, loadable from a JSON file. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Scene document to mutate.
    pub scene_path: PathBuf,
    /// Appended to `scene_path` to name the transient backup.
    pub backup_suffix: String,
    /// Where history is persisted. `None` keeps it in memory only.
    pub history_path: Option<PathBuf>,
    /// How long to wait for a concurrent mutation of the same document.
    pub io_timeout_ms: u64,
    /// Extra templates (JSON array) registered after the built-ins.
    pub templates_path: Option<PathBuf>,
    /// Boilerplate used when templates render a full document.
    pub boilerplate: SceneBoilerplate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scene_path: PathBuf::from("revideo/scene.tsx"),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            history_path: None,
            io_timeout_ms: 5000,
            templates_path: None,
            boilerplate: SceneBoilerplate::default(),
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> SceneResult<()> {
        if self.scene_path.as_os_str().is_empty() {
            return Err(invalid("scene_path must not be empty"));
        }
        if self.backup_suffix.is_empty() {
            return Err(invalid("backup_suffix must not be empty"));
        }
        if self.backup_suffix.contains(['/', '\\']) {
            return Err(invalid("backup_suffix must not contain path separators"));
        }
        if self.io_timeout_ms == 0 {
            return Err(invalid("io_timeout_ms must be greater than zero"));
        }
        if self
            .history_path
            .as_ref()
            .is_some_and(|p| p == &self.scene_path)
        {
            return Err(invalid("history_path must differ from scene_path"));
        }
        self.boilerplate
            .validate()
            .context("boilerplate does not render a scene with exactly one body")?;
        Ok(())
    }

    /// [`io_timeout_ms`](Self::io_timeout_ms) as a [`Duration`].
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

fn invalid(msg: &str) -> SceneError {
    SceneError::Other(anyhow::anyhow!("invalid config: {msg}"))
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
