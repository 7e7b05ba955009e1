//! Command-line launcher for GovAssist retrieval and attribution.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command, ConfigArgs};
pub use commands::{load_documents, resolve_config, run};
