mod cli;
mod config;
mod mill;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use tracing::debug;

use berry_core::{Controller, ControllerError, ErrorLog, ExitStatus, MillError, TracingLog};
use berry_observe::{LoggerConfig, init_logger};

use crate::{cli::Cli, config::MillConfig, mill::RepoMill};

fn main() -> anyhow::Result<ExitCode> {
    // 1) arguments; help and version short-circuit, anything else is the mill's problem
    let args = match Cli::try_parse() {
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            e.exit()
        }
        other => other,
    };

    // 2) logger
    let logger = args
        .as_ref()
        .map(Cli::logger_config)
        .unwrap_or_else(|_| LoggerConfig::default());
    init_logger(&logger)?;
    debug!(format = %logger.format, level = logger.level.as_str(), "logger initialized");

    // 3) mill lifecycle
    let status = execute(args, TracingLog)?;
    debug!(%status, "exiting");
    Ok(status.into())
}

/// Builds a [`RepoMill`] from the parsed arguments and drives it to completion.
fn execute<L: ErrorLog>(
    args: Result<Cli, clap::Error>,
    log: L,
) -> Result<ExitStatus, ControllerError> {
    Controller::new(log).execute(|| {
        let cli = args.map_err(|e| MillError::InvalidArgs(e.to_string().trim().to_string()))?;
        RepoMill::new(MillConfig::try_from(cli)?)
    })
}
