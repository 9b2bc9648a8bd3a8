//! The unit of work driven by the [`Controller`](crate::Controller).
//!
//! A mill is built by a constructor closure handed to the controller, so the
//! controller never sees the arguments or environment the mill was built from.
mod error;
pub use error::MillError;

use crate::flag::Flag;

/// Contract between the controller and the tool's real functionality.
pub trait Mill {
    /// Mill name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether run failures are escalated instead of suppressed.
    ///
    /// Part of the mill's configuration, fixed at construction.
    fn debug(&self) -> Flag;

    /// Performs the tool's work.
    fn run(&mut self) -> Result<(), MillError>;

    /// Releases everything the mill holds.
    ///
    /// Called exactly once after `run`, whatever its outcome.
    fn cleanup(&mut self) -> Result<(), MillError>;
}

impl<M: Mill + ?Sized> Mill for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn debug(&self) -> Flag {
        (**self).debug()
    }

    fn run(&mut self) -> Result<(), MillError> {
        (**self).run()
    }

    fn cleanup(&mut self) -> Result<(), MillError> {
        (**self).cleanup()
    }
}
