//! CLI subcommand implementations.

pub mod fix;
pub mod show;
pub mod summary;
pub mod util;
pub mod validate;
