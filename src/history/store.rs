use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::foundation::error::{SceneError, SceneResult};
use crate::mutate::mutator::SceneMutator;
use crate::mutate::storage::write_atomic;

/// What produced a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// Code proposed by an agent.
    AgentGenerated,
    /// A template expansion.
    TemplateApplied,
    /// Anything else: baselines, hand edits, external changes.
    Manual,
}

impl EntryKind {
    /// Serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AgentGenerated => "agent-generated",
            Self::TemplateApplied => "template-applied",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded scene state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    /// Random identifier.
    pub id: Uuid,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// What produced the entry.
    pub kind: EntryKind,
    /// Human-readable description.
    pub description: String,
    /// Full document text after the change.
    pub scene_snapshot: String,
}

/// Destination for snapshots restored by undo and redo.
pub trait SnapshotSink {
    /// Make `snapshot` the current document.
    fn restore_snapshot(&self, snapshot: &str) -> SceneResult<()>;
}

impl SnapshotSink for SceneMutator {
    fn restore_snapshot(&self, snapshot: &str) -> SceneResult<()> {
        SceneMutator::restore_snapshot(self, snapshot)
    }
}

/// Linear snapshot log with a cursor at the current entry.
///
/// Appending after an undo discards every entry past the cursor. The cursor is `None` exactly
/// when the log is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawHistory")]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

#[derive(serde::Deserialize)]
struct RawHistory {
    entries: Vec<HistoryEntry>,
    #[serde(default)]
    cursor: Option<usize>,
}

impl TryFrom<RawHistory> for HistoryStore {
    type Error = String;

    fn try_from(raw: RawHistory) -> Result<Self, Self::Error> {
        match (raw.cursor, raw.entries.len()) {
            (None, 0) => {}
            (Some(c), len) if c < len => {}
            (cursor, len) => {
                return Err(format!(
                    "history cursor {cursor:?} is inconsistent with {len} entries"
                ));
            }
        }
        Ok(Self {
            entries: raw.entries,
            cursor: raw.cursor,
        })
    }
}

impl HistoryStore {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new current state, discarding any undone future.
    pub fn append(
        &mut self,
        kind: EntryKind,
        description: impl Into<String>,
        snapshot: impl Into<String>,
    ) -> &HistoryEntry {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            tracing::debug!(
                discarded = self.entries.len() - keep,
                "history branch truncated"
            );
            self.entries.truncate(keep);
        }

        self.entries.push(HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            description: description.into(),
            scene_snapshot: snapshot.into(),
        });
        let index = self.entries.len() - 1;
        self.cursor = Some(index);
        &self.entries[index]
    }

    /// Restore the previous entry through `sink` and move the cursor back.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. The cursor only moves once the
    /// snapshot is restored.
    pub fn undo(&mut self, sink: &impl SnapshotSink) -> SceneResult<Option<&HistoryEntry>> {
        let Some(target) = self.cursor.and_then(|c| c.checked_sub(1)) else {
            return Ok(None);
        };
        sink.restore_snapshot(&self.entries[target].scene_snapshot)?;
        self.cursor = Some(target);
        Ok(Some(&self.entries[target]))
    }

    /// Restore the next entry through `sink` and move the cursor forward.
    pub fn redo(&mut self, sink: &impl SnapshotSink) -> SceneResult<Option<&HistoryEntry>> {
        let Some(target) = self.cursor.map(|c| c + 1).filter(|&t| t < self.entries.len()) else {
            return Ok(None);
        };
        sink.restore_snapshot(&self.entries[target].scene_snapshot)?;
        self.cursor = Some(target);
        Ok(Some(&self.entries[target]))
    }

    /// True if an earlier entry exists.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// True if a later entry exists.
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Index of the current entry.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entry at the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.map(|c| &self.entries[c])
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the history as JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> SceneResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::serde(format!("encode history: {e}")))?;
        write_atomic(path, json.as_bytes()).map_err(|e| SceneError::io("save history", path, e))
    }

    /// Read a history written by [`save`](Self::save). A missing file is an empty history.
    pub fn load(path: &Path) -> SceneResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(SceneError::io("load history", path, e)),
        };
        serde_json::from_str(&text)
            .map_err(|e| SceneError::serde(format!("decode history {}: {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/store.rs"]
mod tests;
