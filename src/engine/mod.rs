//! The scene engine facade and its wire response type.

pub(crate) mod response;
pub(crate) mod session;
