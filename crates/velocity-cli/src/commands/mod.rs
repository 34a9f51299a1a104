//! CLI subcommand implementations.

pub(crate) mod config;
pub(crate) mod list;
pub(crate) mod play;
pub(crate) mod show;
