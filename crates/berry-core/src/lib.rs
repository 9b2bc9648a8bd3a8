//! Process lifecycle for berry tools.
//!
//! A [`Controller`] owns one [`Mill`] for the lifetime of the process:
//! it constructs it, runs it, always cleans it up, and decides the exit status.
pub mod controller;
pub mod error;
pub mod flag;
pub mod lifecycle;
pub mod log;
pub mod mill;
pub mod status;

pub use controller::Controller;
pub use error::ControllerError;
pub use flag::Flag;
pub use lifecycle::{Lifecycle, Phase};
pub use log::{ErrorLog, TracingLog};
pub use mill::{Mill, MillError};
pub use status::ExitStatus;

pub mod prelude {
    pub use crate::controller::Controller;
    pub use crate::error::ControllerError;
    pub use crate::flag::Flag;
    pub use crate::log::{ErrorLog, TracingLog};
    pub use crate::mill::{Mill, MillError};
    pub use crate::status::ExitStatus;
}
