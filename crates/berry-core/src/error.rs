use thiserror::Error;

use crate::{lifecycle::Phase, mill::MillError};

#[derive(Debug, Error)]
pub enum ControllerError {
    /// Run failure escalated because the mill runs in debug mode.
    #[error("mill run failed")]
    Run(#[source] MillError),

    /// Cleanup failures are never handled by the controller.
    #[error("mill cleanup failed")]
    Cleanup(#[source] MillError),

    #[error("illegal lifecycle transition: {from} -> {to}")]
    Lifecycle { from: Phase, to: Phase },
}

impl ControllerError {
    /// The mill failure behind this error, if any.
    pub fn mill_error(&self) -> Option<&MillError> {
        match self {
            ControllerError::Run(e) | ControllerError::Cleanup(e) => Some(e),
            ControllerError::Lifecycle { .. } => None,
        }
    }
}
