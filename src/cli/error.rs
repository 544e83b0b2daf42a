//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),

    #[error("no card with id: {0}")]
    CardNotFound(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::CardNotFound(_) => exitcode::DATAERR,
            CliError::Infra(InfraError::AlreadyExists(_)) => exitcode::USAGE,
            CliError::Infra(InfraError::Create { .. }) => exitcode::CANTCREAT,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Config { .. } | ApplicationError::Domain(_) => exitcode::CONFIG,
                ApplicationError::Catalog { .. } => exitcode::DATAERR,
                ApplicationError::Io { .. } => exitcode::IOERR,
                ApplicationError::Serialize { .. } => exitcode::SOFTWARE,
            },
        }
    }
}
