//! mimus CLI Library
//!
//! The command tree, dispatcher and handlers behind the `mimus` binary.
//! [`cli::execute`] runs a full command line and returns its outcome without
//! exiting the process.
//!
//! ```no_run
//! let result = mimus_cli::cli::execute(["mimus", "config", "--services"]);
//! if let Err(e) = result {
//!     eprintln!("{}", e);
//! }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
