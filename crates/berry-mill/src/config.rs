use std::path::{Path, PathBuf};

use berry_core::{Flag, MillError};

use crate::cli::Cli;

/// Everything a [`RepoMill`](crate::mill::RepoMill) needs, fixed before it runs.
#[derive(Debug, Clone)]
pub struct MillConfig {
    /// Root the APT configuration is read from.
    pub root: PathBuf,
    /// Destination of the repository document; stdout when absent.
    pub output: Option<PathBuf>,
    pub debug: Flag,
}

impl MillConfig {
    /// Rejects settings the mill could never run with.
    pub fn validate(&self) -> Result<(), MillError> {
        if !self.root.is_dir() {
            return Err(MillError::Config(format!(
                "root {} is not a directory",
                self.root.display()
            )));
        }

        if let Some(output) = &self.output {
            if output.is_dir() {
                return Err(MillError::Config(format!(
                    "output {} is a directory",
                    output.display()
                )));
            }
            let parent = output
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            if !parent.is_dir() {
                return Err(MillError::Config(format!(
                    "output directory {} does not exist",
                    parent.display()
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<Cli> for MillConfig {
    type Error = MillError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let cfg = MillConfig {
            root: cli.root,
            output: cli.output,
            debug: Flag::from(cli.debug),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
