mod config;
mod error;
mod log;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::{LoggerTimeZone, init_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Must be called once, before the first log line is emitted.
/// Any later call fails with [`LoggerError::AlreadyInitialized`].
///
/// # Important: Local Timezone
/// For `LoggerTimeZone::Local` call [`init_local_offset`] first,
/// while the process is still single-threaded.
///
/// # Examples
/// ```rust
/// use berry_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger must install once");
///
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    if cfg.tz == LoggerTimeZone::Local {
        init_local_offset();
    }

    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
