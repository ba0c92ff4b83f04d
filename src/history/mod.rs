//! Undo/redo history of full scene snapshots.

pub(crate) mod store;
