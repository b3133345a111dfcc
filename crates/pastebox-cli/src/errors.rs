//! CLI error types for structured error handling.
//!
//! Command handlers return `anyhow::Result`; the error chain is inspected
//! once in `main` to pick the process exit code.

use std::fmt;

use pastebox_core::PasteError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for a store error.
pub fn paste_exit_code(err: &PasteError) -> i32 {
    match err {
        PasteError::NotFound(_) => exit_codes::NOT_FOUND,
        PasteError::Validation(_) | PasteError::Configuration(_) => exit_codes::INVALID_INPUT,
        PasteError::Duplicated { .. } => exit_codes::ALREADY_EXISTS,
        PasteError::StorageUnavailable(_) => exit_codes::STORAGE_UNAVAILABLE,
        PasteError::Transient(_) => exit_codes::TEMPORARY_FAILURE,
        PasteError::NotConnected | PasteError::InvalidCiphertext | PasteError::Crypto(_) => {
            exit_codes::GENERAL
        }
    }
}

/// Exit code for an error returned by a command handler.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<PasteError>() {
        Some(paste_err) => paste_exit_code(paste_err),
        None => exit_codes::GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_store_errors_map_to_exit_codes() {
        let not_found: anyhow::Error = PasteError::NotFound("text \"abc\"".to_string()).into();
        assert_eq!(exit_code(&not_found), exit_codes::NOT_FOUND);

        let duplicated: anyhow::Error = PasteError::Duplicated {
            object_type: "text",
            object_id: "abc".to_string(),
        }
        .into();
        assert_eq!(exit_code(&duplicated), exit_codes::ALREADY_EXISTS);

        let transient: anyhow::Error = PasteError::Transient("locked".to_string()).into();
        assert_eq!(exit_code(&transient), exit_codes::TEMPORARY_FAILURE);
    }

    #[test]
    fn test_context_does_not_hide_exit_code() {
        let result: Result<(), PasteError> =
            Err(PasteError::StorageUnavailable("refused".to_string()));
        let err = result.context("Failed to open database").unwrap_err();

        assert_eq!(exit_code(&err), exit_codes::STORAGE_UNAVAILABLE);
    }

    #[test]
    fn test_cli_errors_and_unknown_errors() {
        let err: anyhow::Error = CliError::invalid_input("No input provided on stdin").into();
        assert_eq!(exit_code(&err), exit_codes::INVALID_INPUT);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), exit_codes::GENERAL);
    }
}
