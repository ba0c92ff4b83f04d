use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

use crate::foundation::error::{SceneError, SceneResult};

/// Hands out one [`DocumentGate`] per document path.
///
/// Mutators that share a registry and target the same path are mutually exclusive. Paths are
/// made absolute before lookup, so `scene.tsx` and `./scene.tsx` share a gate.
#[derive(Debug, Default)]
pub struct GateRegistry {
    gates: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl GateRegistry {
    /// A registry independent of every other one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used when no other is injected.
    pub fn global() -> &'static GateRegistry {
        static GLOBAL: OnceLock<GateRegistry> = OnceLock::new();
        GLOBAL.get_or_init(GateRegistry::new)
    }

    /// Gate for `path`, created on first use.
    ///
    /// Entries whose gates have all been dropped are pruned here, so the map only holds paths
    /// that some mutator still targets.
    pub fn gate(&self, path: &Path) -> DocumentGate {
        let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut gates = self.gates.lock();
        gates.retain(|_, lock| Arc::strong_count(lock) > 1);
        let lock = gates
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        DocumentGate { path: key, lock }
    }

    /// Number of paths tracked, including ones whose gates were dropped since the last
    /// [`gate`](Self::gate) call.
    pub fn len(&self) -> usize {
        self.gates.lock().len()
    }

    /// True if no path is tracked.
    pub fn is_empty(&self) -> bool {
        self.gates.lock().is_empty()
    }
}

/// Exclusive access to one document, held for a whole mutation.
#[derive(Clone, Debug)]
pub struct DocumentGate {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

/// Held while a mutation is in flight; dropping it opens the gate.
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct GateGuard {
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl DocumentGate {
    /// Absolute path this gate protects.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait up to `timeout` for exclusive access.
    pub fn lock(&self, timeout: Duration) -> SceneResult<GateGuard> {
        match self.lock.try_lock_arc_for(timeout) {
            Some(guard) => Ok(GateGuard { _guard: guard }),
            None => Err(SceneError::io(
                "lock",
                &self.path,
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("document busy for more than {}ms", timeout.as_millis()),
                ),
            )),
        }
    }

    /// Whether `other` guards the same document through the same registry.
    pub fn same_as(&self, other: &DocumentGate) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutate/gate.rs"]
mod tests;
