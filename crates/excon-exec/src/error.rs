use std::path::PathBuf;

use thiserror::Error;

pub type ExecResult<T> = Result<T, ExecError>;

/// Failures of the supervisor itself.
///
/// A runtime that runs and exits non-zero is not an error here; it comes back
/// as an ordinary exit code.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("cannot redirect output to {path}: {reason}")]
    Redirect { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExecError {
    fn from(e: std::io::Error) -> Self {
        ExecError::Io(e.to_string())
    }
}
