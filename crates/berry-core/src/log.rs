//! Error sink injected into the controller.
use std::{error::Error, fmt, sync::Arc};

use tracing::error;

/// Receives the failures the controller classifies.
pub trait ErrorLog {
    /// Records a failure under a fixed, phase-identifying message.
    fn error(&self, message: &str, cause: &dyn Error);
}

impl<T: ErrorLog + ?Sized> ErrorLog for &T {
    fn error(&self, message: &str, cause: &dyn Error) {
        (**self).error(message, cause)
    }
}

impl<T: ErrorLog + ?Sized> ErrorLog for Box<T> {
    fn error(&self, message: &str, cause: &dyn Error) {
        (**self).error(message, cause)
    }
}

impl<T: ErrorLog + ?Sized> ErrorLog for Arc<T> {
    fn error(&self, message: &str, cause: &dyn Error) {
        (**self).error(message, cause)
    }
}

/// Forwards failures to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl ErrorLog for TracingLog {
    fn error(&self, message: &str, cause: &dyn Error) {
        error!(error = %Chain(cause), "{message}");
    }
}

/// `outer: inner: root` rendering of an error and its sources.
pub(crate) struct Chain<'a>(pub &'a dyn Error);

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(e) = source {
            write!(f, ": {e}")?;
            source = e.source();
        }
        Ok(())
    }
}
