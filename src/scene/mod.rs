//! Scene document model: the mutable region and the fixed boilerplate around it.

pub(crate) mod boilerplate;
pub(crate) mod document;
