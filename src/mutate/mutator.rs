use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::foundation::error::{SceneError, SceneResult};
use crate::mutate::gate::{DocumentGate, GateRegistry};
use crate::mutate::storage::SceneStorage;
use crate::scene::document::SceneDocument;
use crate::syntax::validate::{validate, validate_document};

/// Default suffix of the transient backup written next to the document.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

/// Default time to wait for another mutation of the same document to finish.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

/// How `source` is turned into the next document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyMode {
    /// `source` replaces the mutable region; the boilerplate is kept.
    Region,
    /// `source` is a complete document and replaces the file.
    FullDocument,
}

/// Outcome of a committed [`SceneMutator::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// Document text now on storage.
    pub content: String,
    /// Mode the source was applied in.
    pub mode: ApplyMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MutationState {
    Validating,
    BackingUp,
    Locating,
    Writing,
    Committed,
    RollingBack,
    Failed,
}

/// Applies changes to one scene document with backup and rollback.
///
/// Each call either commits a document that parses with exactly one mutable region, or leaves
/// the previous content in place. The only exception is a failed rollback, reported as
/// [`SceneError::Corruption`] with the backup left on storage.
pub struct SceneMutator {
    path: PathBuf,
    backup_path: PathBuf,
    storage: Arc<dyn SceneStorage>,
    gate: DocumentGate,
    lock_timeout: Duration,
}

impl std::fmt::Debug for SceneMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneMutator")
            .field("path", &self.path)
            .field("backup_path", &self.backup_path)
            .field("lock_timeout", &self.lock_timeout)
            .finish_non_exhaustive()
    }
}

impl SceneMutator {
    /// Mutator for `path`, serialized with every other mutator built from `gates` for the same
    /// path.
    pub fn new(
        path: impl Into<PathBuf>,
        storage: Arc<dyn SceneStorage>,
        gates: &GateRegistry,
    ) -> Self {
        let path = path.into();
        Self {
            backup_path: with_suffix(&path, DEFAULT_BACKUP_SUFFIX),
            gate: gates.gate(&path),
            path,
            storage,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Use `<path><suffix>` as the backup file.
    pub fn with_backup_suffix(mut self, suffix: &str) -> Self {
        self.backup_path = with_suffix(&self.path, suffix);
        self
    }

    /// Wait at most `timeout` for the document gate.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup path.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// True if a backup is on storage outside of a mutation, i.e. an earlier process stopped
    /// mid-write or a rollback failed.
    pub fn has_stale_backup(&self) -> bool {
        self.storage.exists(&self.backup_path)
    }

    /// Current document text.
    pub fn read(&self) -> SceneResult<String> {
        self.storage
            .read(&self.path)
            .map_err(|e| SceneError::io("read", &self.path, e))
    }

    /// Current document, parsed.
    pub fn document(&self) -> SceneResult<SceneDocument> {
        SceneDocument::parse(self.read()?)
    }

    /// Validate `source` and commit it to the document.
    #[tracing::instrument(skip(self, source), fields(path = %self.path.display(), bytes = source.len()))]
    pub fn apply(&self, source: &str, mode: ApplyMode) -> SceneResult<Applied> {
        self.transition(MutationState::Validating);
        let checked = match mode {
            ApplyMode::Region => validate(source),
            ApplyMode::FullDocument => validate_document(source),
        };
        if !checked.ok {
            tracing::warn!(errors = ?checked.errors, "rejected invalid source");
            self.transition(MutationState::Failed);
            return Err(SceneError::validation(checked.errors));
        }

        let _guard = self.gate.lock(self.lock_timeout)?;
        self.backup()?;

        self.transition(MutationState::Locating);
        let next = match self.prepare(source, mode) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(error = %err, "mutation rejected before write");
                self.discard_backup();
                self.transition(MutationState::Failed);
                return Err(err);
            }
        };

        self.commit(&next)?;
        tracing::debug!(?mode, "scene updated");
        Ok(Applied {
            content: next,
            mode,
        })
    }

    /// Write `snapshot` as the whole document without checking it.
    ///
    /// Used by undo and redo, whose snapshots were valid documents when recorded.
    #[tracing::instrument(skip(self, snapshot), fields(path = %self.path.display(), bytes = snapshot.len()))]
    pub fn restore_snapshot(&self, snapshot: &str) -> SceneResult<()> {
        let _guard = self.gate.lock(self.lock_timeout)?;
        self.backup()?;
        self.commit(snapshot)
    }

    fn prepare(&self, source: &str, mode: ApplyMode) -> SceneResult<String> {
        let next = match mode {
            ApplyMode::Region => self.document()?.with_region(source),
            ApplyMode::FullDocument => source.to_string(),
        };
        Ok(SceneDocument::parse(next)?.into_text())
    }

    fn backup(&self) -> SceneResult<()> {
        self.transition(MutationState::BackingUp);
        self.storage
            .copy(&self.path, &self.backup_path)
            .map_err(|e| {
                self.transition(MutationState::Failed);
                SceneError::io("backup", &self.path, e)
            })
    }

    fn commit(&self, next: &str) -> SceneResult<()> {
        self.transition(MutationState::Writing);
        let Err(write_err) = self.storage.write(&self.path, next) else {
            self.discard_backup();
            self.transition(MutationState::Committed);
            return Ok(());
        };

        self.transition(MutationState::RollingBack);
        let write_err = SceneError::io("write", &self.path, write_err);
        let restored = self.storage.copy(&self.backup_path, &self.path);
        self.transition(MutationState::Failed);
        match restored {
            Ok(()) => {
                tracing::warn!(error = %write_err, "write failed, document restored from backup");
                self.discard_backup();
                Err(write_err)
            }
            Err(restore_err) => {
                tracing::error!(
                    path = %self.path.display(),
                    backup = %self.backup_path.display(),
                    write_error = %write_err,
                    restore_error = %restore_err,
                    "rollback failed, scene document may be corrupted; backup left in place"
                );
                Err(SceneError::Corruption {
                    path: self.path.clone(),
                    write_error: write_err.to_string(),
                    restore_error: restore_err.to_string(),
                })
            }
        }
    }

    fn discard_backup(&self) {
        if let Err(err) = self.storage.remove(&self.backup_path) {
            tracing::warn!(backup = %self.backup_path.display(), error = %err, "could not remove backup");
        }
    }

    fn transition(&self, state: MutationState) {
        tracing::trace!(?state, "mutation state");
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "../../tests/unit/mutate/mutator.rs"]
mod tests;
