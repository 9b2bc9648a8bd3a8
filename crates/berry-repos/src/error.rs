use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unknown repository format: {0}")]
    UnknownFormat(String),

    #[error("malformed repository attribute '{attr}' in: {line}")]
    BadAttribute { attr: String, line: String },

    #[error("unable to merge {actual} into {expected}")]
    MergeMismatch { expected: String, actual: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepoError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
