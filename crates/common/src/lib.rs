//! Shared configuration and bootstrapping.
//!
//! This crate owns the two cross-cutting concerns every other crate touches:
//! the terminal's directory layout (where command and status files live) and
//! logging initialization for binaries.

mod logging;
mod paths;

pub use logging::init_logging;
pub use paths::{TerminalPaths, ROOT_ENV_VAR};
