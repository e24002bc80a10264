//! Top-level error shown to the user, with its process exit code

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// sysexits code for the innermost cause.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::StorePath(_) => crate::exitcode::CANTCREAT,
                InfraError::Application(app) => match app {
                    ApplicationError::StoreNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::StoreExists(_) => crate::exitcode::CANTCREAT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::InvalidDrop { .. } => crate::exitcode::USAGE,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::Domain(d) => match d {
                        DomainError::InvalidStructure { .. } => crate::exitcode::DATAERR,
                        DomainError::NullInput | DomainError::EmptyTree => crate::exitcode::NOINPUT,
                        DomainError::InvalidArgument(_) | DomainError::NodeNotFound(_) => {
                            crate::exitcode::USAGE
                        }
                    },
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_structure_error_when_mapping_exit_code_then_dataerr() {
        let err: CliError = ApplicationError::Domain(DomainError::InvalidStructure {
            index: 2,
            reason: "jump".into(),
        })
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_missing_store_when_mapping_exit_code_then_noinput() {
        let err: CliError = ApplicationError::StoreNotFound(PathBuf::from("/x")).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}
