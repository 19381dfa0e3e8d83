//! CLI tool for building and querying Chord rings.
//!
//! Provides commands for:
//! - Looking up the owner of a key from any starting node
//! - Inspecting successors, active nodes and finger tables
//! - Text or JSON output

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, OutputFormat};
