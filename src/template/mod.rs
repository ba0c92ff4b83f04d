//! Typed, reusable scene templates.
//!
//! A [`Template`](model::Template) is a region body with `{{name}}` placeholders and a list of
//! declared, typed variables. Expansion checks supplied values against the declarations and
//! substitutes literals in a single pass.

pub(crate) mod builtin;
pub(crate) mod expand;
pub(crate) mod model;
pub(crate) mod registry;
pub(crate) mod value;
