//! Infrastructure-level errors (wraps application errors)

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add write-side failures.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("refusing to overwrite {0}")]
    AlreadyExists(PathBuf),

    #[error("cannot create {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InfraError {
    /// Classify a failed file creation at `path`.
    pub fn create(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => Self::Create {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
