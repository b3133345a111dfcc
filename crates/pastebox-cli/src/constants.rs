//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Text not found, or not readable with the configured secret.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, arguments or configuration.
    pub const INVALID_INPUT: i32 = 4;

    /// A text with the same identifier already exists.
    pub const ALREADY_EXISTS: i32 = 5;

    /// The database could not be opened.
    pub const STORAGE_UNAVAILABLE: i32 = 6;

    /// The operation failed but may succeed if retried.
    pub const TEMPORARY_FAILURE: i32 = 7;
}
