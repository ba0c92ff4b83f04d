//! scenewright merges proposed code into a live animation scene without ever leaving it broken.
//!
//! A scene document is a TSX file whose single mutable region is the body of the generator passed
//! to `makeScene2D`. The API is engine-oriented:
//!
//! - Open a [`SceneEngine`] over a document (see [`EngineConfig`])
//! - Apply code to the region, or expand a [`Template`] into a whole document
//! - Step through the snapshot history with undo and redo
//!
//! Every change is syntax-checked first, backed up, written atomically and rolled back on
//! failure. [`validate`] is also usable on its own.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Engine settings.
pub mod config;
pub(crate) mod engine;
pub(crate) mod history;
pub(crate) mod mutate;
pub(crate) mod scene;
pub(crate) mod syntax;
pub(crate) mod template;

pub use crate::config::EngineConfig;
pub use crate::foundation::error::{SceneError, SceneResult, TemplateError};

pub use crate::engine::response::ApplyResponse;
pub use crate::engine::session::{BASELINE_DESCRIPTION, EXTERNAL_CHANGE_DESCRIPTION, SceneEngine};
pub use crate::history::store::{EntryKind, HistoryEntry, HistoryStore, SnapshotSink};
pub use crate::mutate::gate::{DocumentGate, GateGuard, GateRegistry};
pub use crate::mutate::mutator::{
    Applied, ApplyMode, DEFAULT_BACKUP_SUFFIX, DEFAULT_LOCK_TIMEOUT, SceneMutator,
};
pub use crate::mutate::storage::{FsStorage, MemoryStorage, SceneStorage};
pub use crate::scene::boilerplate::{DEFAULT_HEADER, SceneBoilerplate};
pub use crate::scene::document::{SCENE_FACTORY, SceneDocument};
pub use crate::syntax::validate::{MAX_SOURCE_BYTES, Validation, validate, validate_document};
pub use crate::template::expand::{ExpansionMode, expand, expand_with};
pub use crate::template::model::{Template, TemplateSource, TemplateSummary, TemplateVariable};
pub use crate::template::registry::TemplateRegistry;
pub use crate::template::value::{TemplateValue, TemplateValues, VariableKind, values_from_json};
