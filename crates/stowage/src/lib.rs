//! Stowage CLI library
//!
//! Exposes the command-line surface for programmatic use and testing.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod sink;

pub use cli::{Cli, Commands, StoreArgs};
pub use sink::{DirectoryLoader, SinkError};
