use std::path::PathBuf;

use clap::Parser;

use berry_observe::{LoggerConfig, LoggerFormat, LoggerLevel};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "berry-mill",
    version,
    about = "Collect the APT repositories configured on this host"
)]
pub struct Cli {
    /// Filesystem root to read APT source lists from
    #[arg(long, default_value = "/")]
    pub root: PathBuf,

    /// Write the repository document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail loudly: run errors abort with a diagnostic instead of being logged and ignored
    #[arg(short, long)]
    pub debug: bool,

    /// Log filter expression (e.g. "info", "berry_repos=trace,warn")
    #[arg(long)]
    pub log_level: Option<LoggerLevel>,

    /// Log output format: text, json or journald
    #[arg(long, default_value = "text")]
    pub log_format: LoggerFormat,
}

impl Cli {
    /// Logger settings requested on the command line.
    ///
    /// `--debug` lowers the default filter to `debug`; an explicit
    /// `--log-level` always wins.
    pub fn logger_config(&self) -> LoggerConfig {
        let level = match (&self.log_level, self.debug) {
            (Some(level), _) => level.clone(),
            (None, true) => LoggerLevel::debug(),
            (None, false) => LoggerLevel::default(),
        };
        LoggerConfig::default()
            .with_format(self.log_format)
            .with_level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["berry-mill"]).unwrap();

        assert_eq!(cli.root, PathBuf::from("/"));
        assert!(cli.output.is_none());
        assert!(!cli.debug);

        let log = cli.logger_config();
        assert_eq!(log.level.as_str(), "info");
        assert_eq!(log.format, LoggerFormat::Text);
    }

    #[test]
    fn debug_lowers_default_level() {
        let cli = Cli::try_parse_from(["berry-mill", "--debug"]).unwrap();
        assert_eq!(cli.logger_config().level.as_str(), "debug");
    }

    #[test]
    fn explicit_level_beats_debug() {
        let cli =
            Cli::try_parse_from(["berry-mill", "-d", "--log-level", "berry_repos=trace,warn"]).unwrap();
        assert_eq!(cli.logger_config().level.as_str(), "berry_repos=trace,warn");
    }

    #[test]
    fn parses_output_and_format() {
        let cli = Cli::try_parse_from([
            "berry-mill",
            "--root",
            "/srv/chroot",
            "-o",
            "/tmp/repos.json",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.root, PathBuf::from("/srv/chroot"));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/repos.json")));
        assert_eq!(cli.logger_config().format, LoggerFormat::Json);
    }

    #[test]
    fn rejects_bad_logger_values() {
        assert!(Cli::try_parse_from(["berry-mill", "--log-format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["berry-mill", "--log-level", "berry=loud"]).is_err());
    }
}
