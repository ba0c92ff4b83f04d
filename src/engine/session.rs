use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::foundation::error::{SceneError, SceneResult};
use crate::history::store::{EntryKind, HistoryEntry, HistoryStore};
use crate::mutate::gate::GateRegistry;
use crate::mutate::mutator::{ApplyMode, SceneMutator};
use crate::mutate::storage::{FsStorage, SceneStorage};
use crate::template::expand::{ExpansionMode, expand_with};
use crate::template::model::{TemplateSource, TemplateSummary};
use crate::template::registry::TemplateRegistry;
use crate::template::value::TemplateValues;

/// Description recorded for the entry created when a scene is opened with no history.
pub const BASELINE_DESCRIPTION: &str = "initial scene";

/// Description recorded when the document on storage differs from the last recorded snapshot.
pub const EXTERNAL_CHANGE_DESCRIPTION: &str = "scene changed outside the engine";

struct EngineState {
    mutator: SceneMutator,
    history: HistoryStore,
}

/// The inbound surface: applies code and templates to one scene document and keeps its history.
///
/// Every successful apply appends exactly one history entry. All operations are serialized.
pub struct SceneEngine {
    config: EngineConfig,
    templates: TemplateRegistry,
    state: Mutex<EngineState>,
}

impl std::fmt::Debug for SceneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEngine")
            .field("config", &self.config)
            .field("templates", &self.templates.len())
            .finish_non_exhaustive()
    }
}

impl SceneEngine {
    /// Open the scene described by `config` through the process-wide gate registry.
    pub fn open(
        config: EngineConfig,
        templates: TemplateRegistry,
        storage: Arc<dyn SceneStorage>,
    ) -> SceneResult<Self> {
        Self::open_with_gates(config, templates, storage, GateRegistry::global())
    }

    /// Open on the local filesystem with the built-in templates plus `config.templates_path`.
    pub fn open_fs(config: EngineConfig) -> SceneResult<Self> {
        let mut templates = TemplateRegistry::with_builtins();
        if let Some(path) = &config.templates_path {
            templates.load_json(path)?;
        }
        Self::open(config, templates, Arc::new(FsStorage))
    }

    /// Open with an explicit gate registry.
    ///
    /// The document must parse with exactly one mutable region. If history is empty, the
    /// current document is recorded as a `manual` baseline so the first apply can be undone.
    #[tracing::instrument(skip_all, fields(scene = %config.scene_path.display()))]
    pub fn open_with_gates(
        config: EngineConfig,
        templates: TemplateRegistry,
        storage: Arc<dyn SceneStorage>,
        gates: &GateRegistry,
    ) -> SceneResult<Self> {
        config.validate()?;
        let mutator = SceneMutator::new(config.scene_path.clone(), storage, gates)
            .with_backup_suffix(&config.backup_suffix)
            .with_lock_timeout(config.io_timeout());
        if mutator.has_stale_backup() {
            tracing::warn!(
                backup = %mutator.backup_path().display(),
                "stale backup found; an earlier mutation did not finish cleanly"
            );
        }

        let document = mutator.document()?;
        let mut history = match &config.history_path {
            Some(path) => HistoryStore::load(path)?,
            None => HistoryStore::new(),
        };

        let recorded = history.current().map(|e| e.scene_snapshot.as_str());
        let baseline = match recorded {
            None => Some(BASELINE_DESCRIPTION),
            Some(snapshot) if snapshot != document.text() => Some(EXTERNAL_CHANGE_DESCRIPTION),
            Some(_) => None,
        };
        if let Some(description) = baseline {
            history.append(EntryKind::Manual, description, document.into_text());
        }

        let engine = Self {
            config,
            templates,
            state: Mutex::new(EngineState { mutator, history }),
        };
        if baseline.is_some() {
            engine.persist(&engine.state.lock().history)?;
        }
        tracing::debug!(templates = engine.templates.len(), "scene engine ready");
        Ok(engine)
    }

    /// Write a fresh scene rendered from `config.boilerplate` with an empty region.
    ///
    /// An existing document is kept unless `force` is set. Returns whether anything was
    /// written.
    pub fn init_scene(
        config: &EngineConfig,
        storage: &dyn SceneStorage,
        force: bool,
    ) -> SceneResult<bool> {
        config.validate()?;
        let path = &config.scene_path;
        if storage.exists(path) && !force {
            tracing::debug!(scene = %path.display(), "scene already exists");
            return Ok(false);
        }
        storage
            .write(path, &config.boilerplate.render(""))
            .map_err(|e| SceneError::io("init", path, e))?;
        Ok(true)
    }

    /// Settings the engine was opened with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Templates available to [`apply_template`](Self::apply_template).
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Replace the mutable region with `code`, recorded as agent-generated.
    pub fn apply_code(&self, code: &str) -> SceneResult<HistoryEntry> {
        self.apply_code_as(code, EntryKind::AgentGenerated, "applied generated code")
    }

    /// Replace the mutable region with `code`, recorded with the given kind and description.
    #[tracing::instrument(skip(self, code, description), fields(bytes = code.len()))]
    pub fn apply_code_as(
        &self,
        code: &str,
        kind: EntryKind,
        description: impl Into<String>,
    ) -> SceneResult<HistoryEntry> {
        self.commit(code, ApplyMode::Region, kind, description.into())
    }

    /// Expand a template into a full document and apply it.
    ///
    /// Expansion errors are reported before the document is touched. `values` may be omitted
    /// for templates without variables.
    #[tracing::instrument(skip(self, source, values))]
    pub fn apply_template(
        &self,
        source: impl Into<TemplateSource>,
        values: Option<&TemplateValues>,
    ) -> SceneResult<HistoryEntry> {
        let source = source.into();
        let template = match &source {
            TemplateSource::Id(id) => self.templates.resolve(id)?,
            TemplateSource::Inline(template) => {
                template.check()?;
                template.as_ref()
            }
        };

        let empty = TemplateValues::new();
        let document = expand_with(
            template,
            values.unwrap_or(&empty),
            ExpansionMode::FullDocument,
            &self.config.boilerplate,
        )?;
        let description = format!("applied template '{}'", template.label());
        self.commit(
            &document,
            ApplyMode::FullDocument,
            EntryKind::TemplateApplied,
            description,
        )
    }

    /// Template summaries, optionally only those carrying `tag`.
    pub fn list_templates(&self, tag: Option<&str>) -> Vec<TemplateSummary> {
        self.templates.summaries(tag)
    }

    /// Restore the previous snapshot. `Ok(None)` if there is nothing to undo.
    #[tracing::instrument(skip(self))]
    pub fn undo(&self) -> SceneResult<Option<HistoryEntry>> {
        let mut state = self.state.lock();
        let EngineState { mutator, history } = &mut *state;
        let Some(entry) = history.undo(&*mutator)?.cloned() else {
            tracing::debug!("nothing to undo");
            return Ok(None);
        };
        self.persist(history)?;
        Ok(Some(entry))
    }

    /// Restore the next snapshot. `Ok(None)` if there is nothing to redo.
    #[tracing::instrument(skip(self))]
    pub fn redo(&self) -> SceneResult<Option<HistoryEntry>> {
        let mut state = self.state.lock();
        let EngineState { mutator, history } = &mut *state;
        let Some(entry) = history.redo(&*mutator)?.cloned() else {
            tracing::debug!("nothing to redo");
            return Ok(None);
        };
        self.persist(history)?;
        Ok(Some(entry))
    }

    /// True if [`undo`](Self::undo) would change the document.
    pub fn can_undo(&self) -> bool {
        self.state.lock().history.can_undo()
    }

    /// True if [`redo`](Self::redo) would change the document.
    pub fn can_redo(&self) -> bool {
        self.state.lock().history.can_redo()
    }

    /// Copy of the current history.
    pub fn history(&self) -> HistoryStore {
        self.state.lock().history.clone()
    }

    /// Current document text, read from storage.
    pub fn scene(&self) -> SceneResult<String> {
        self.state.lock().mutator.read()
    }

    fn commit(
        &self,
        source: &str,
        mode: ApplyMode,
        kind: EntryKind,
        description: String,
    ) -> SceneResult<HistoryEntry> {
        let mut state = self.state.lock();
        let applied = state.mutator.apply(source, mode)?;
        let entry = state
            .history
            .append(kind, description, applied.content)
            .clone();
        self.persist(&state.history)?;
        tracing::debug!(%kind, id = %entry.id, "change recorded");
        Ok(entry)
    }

    fn persist(&self, history: &HistoryStore) -> SceneResult<()> {
        match &self.config.history_path {
            Some(path) => history.save(path),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/session.rs"]
mod tests;
