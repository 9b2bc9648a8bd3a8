use thiserror::Error;

#[derive(Debug, Error)]
pub enum MillError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("processing failed: {0}")]
    Processing(String),

    #[error("internal error: {0}")]
    Internal(String),
}
