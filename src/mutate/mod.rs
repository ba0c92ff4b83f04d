//! Transactional updates of the scene document.

pub(crate) mod gate;
pub(crate) mod mutator;
pub(crate) mod storage;
