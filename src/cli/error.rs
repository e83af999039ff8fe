//! CLI-level errors (wraps config and domain errors)

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Tree(TreeError::TooLarge { .. }) => crate::exitcode::DATAERR,
            CliError::Tree(_) => crate::exitcode::SOFTWARE,
            CliError::Io(_) => crate::exitcode::IOERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_oversized_tree_error_when_mapping_then_uses_dataerr() {
        let err = CliError::from(TreeError::TooLarge {
            depth: 30,
            arity: 4,
            max_nodes: 10,
        });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_invalid_setting_when_mapping_then_uses_config() {
        let err = CliError::from(SettingsError::Invalid {
            key: "repeat",
            reason: "must be at least 1".into(),
        });
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
        assert_eq!(err.to_string(), "invalid setting 'repeat': must be at least 1");
    }
}
