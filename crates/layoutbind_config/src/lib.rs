//! Parsing and validation of `layoutbind.toml` module configuration files.
//!
//! This crate reads the per-module configuration and produces a strongly-typed
//! [`ModuleConfig`] naming the module package, the folders the resolver reads and
//! writes, and whether incremental builds are enabled.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_paths, ResolvedPaths};
pub use types::*;
