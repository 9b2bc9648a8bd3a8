//! Drives a [`Mill`] through construct → run → cleanup.
//!
//! Failures are classified by the phase they come from:
//! - construction: logged as [`CONSTRUCT_ERROR`], exit status 1, nothing to clean up;
//! - run: logged as [`RUN_ERROR`], suppressed unless the mill is in debug mode,
//!   in which case it is returned after cleanup;
//! - cleanup: returned as-is and overrides any earlier decision.
use tracing::{debug, info, instrument};

use crate::{
    error::ControllerError,
    lifecycle::{Lifecycle, Phase},
    log::ErrorLog,
    mill::{Mill, MillError},
    status::ExitStatus,
};

/// Message logged when the mill cannot be constructed.
pub const CONSTRUCT_ERROR: &str = "General error";

/// Message logged when the mill fails while running.
pub const RUN_ERROR: &str = "Run error";

/// Owns a mill for one process lifetime.
///
/// A controller executes once; build a fresh one per invocation.
pub struct Controller<L> {
    log: L,
    lifecycle: Lifecycle,
}

impl<L: ErrorLog> Controller<L> {
    /// Create a controller reporting failures to `log`.
    pub fn new(log: L) -> Self {
        Self {
            log,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.current()
    }

    /// Constructs the mill with `construct`, runs it and cleans it up.
    ///
    /// Returns the exit status for the process, or the error that must
    /// terminate it: a debug-mode run failure or any cleanup failure.
    /// Cleanup has always happened by the time this returns, provided
    /// construction succeeded.
    #[instrument(level = "debug", skip_all)]
    pub fn execute<M, F>(&mut self, construct: F) -> Result<ExitStatus, ControllerError>
    where
        M: Mill,
        F: FnOnce() -> Result<M, MillError>,
    {
        self.lifecycle.advance(Phase::Constructing)?;

        let mut mill = match construct() {
            Ok(mill) => mill,
            Err(e) => {
                self.log.error(CONSTRUCT_ERROR, &e);
                self.lifecycle.enter(Phase::ConstructFailed);
                self.lifecycle.enter(Phase::Exited);
                return Ok(ExitStatus::Failure);
            }
        };
        self.lifecycle.enter(Phase::Constructed);

        let debug_mode = mill.debug();
        info!(mill = mill.name(), debug = debug_mode.is_enabled(), "mill constructed");

        let ran = self.run(&mut mill);
        self.cleanup(&mut mill)?;

        match ran {
            Ok(()) => Ok(ExitStatus::Success),
            Err(e) if debug_mode.is_enabled() => Err(ControllerError::Run(e)),
            Err(_) => Ok(ExitStatus::Success),
        }
    }

    fn run<M: Mill>(&mut self, mill: &mut M) -> Result<(), MillError> {
        self.lifecycle.enter(Phase::Running);

        match mill.run() {
            Ok(()) => {
                self.lifecycle.enter(Phase::RanOk);
                Ok(())
            }
            Err(e) => {
                self.log.error(RUN_ERROR, &e);
                self.lifecycle.enter(Phase::RanFailed);
                Err(e)
            }
        }
    }

    fn cleanup<M: Mill>(&mut self, mill: &mut M) -> Result<(), ControllerError> {
        self.lifecycle.enter(Phase::CleaningUp);
        mill.cleanup().map_err(ControllerError::Cleanup)?;
        self.lifecycle.enter(Phase::Done);

        debug!(mill = mill.name(), "mill cleaned up");
        Ok(())
    }
}
