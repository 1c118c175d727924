//! CLI module for the custody wallet binary

pub mod commands;

pub use commands::{AppState, CliResult};
