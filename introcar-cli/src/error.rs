use thiserror::Error;

use introcar_data::DataError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Loading an input or writing an output failed
    #[error("{0}")]
    Data(#[from] DataError),
}
