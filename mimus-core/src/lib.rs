//! mimus Core Library
//!
//! Configuration model, service resolution and error types shared by the
//! mimus command-line tool.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{default_config_path, resolve_config_path, Config, ConfigFile, Service};
pub use error::*;
