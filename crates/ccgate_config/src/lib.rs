//! Compile request configuration for the ccgate compiler gateway.
//!
//! A [`CompileRequestConfig`] is assembled once, either through
//! [`CompileRequestConfig::builder`] or by loading a `ccgate.toml` file, and is
//! then handed by reference to the cache and transport layers. It is never
//! mutated after a compile is requested.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
