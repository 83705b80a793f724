//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes the engine's TOML settings file
//! and falls back to defaults when the file does not exist yet.

pub mod config;
