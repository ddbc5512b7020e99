//! CLI command definitions and handlers
//!
//! This module organizes the CLI into logical submodules:
//! - [`commands`] - Command and subcommand definitions
//! - [`dispatch`] - Argument parsing and command dispatch
//! - [`handlers`] - Command execution handlers

mod commands;
mod dispatch;
mod handlers;

pub use commands::*;
pub use dispatch::*;
pub use handlers::*;
