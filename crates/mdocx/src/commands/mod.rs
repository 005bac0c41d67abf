//! CLI command implementations.

pub(crate) mod ops;
pub(crate) mod render;
mod source;

pub(crate) use ops::OpsArgs;
pub(crate) use render::RenderArgs;
