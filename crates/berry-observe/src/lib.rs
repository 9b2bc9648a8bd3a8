//! Logging backend for the berry tools.
//!
//! Installs a process-wide `tracing` subscriber from a [`LoggerConfig`].
//! Output goes to stderr so that tool output on stdout stays machine-readable.
mod logger;
pub use logger::*;
