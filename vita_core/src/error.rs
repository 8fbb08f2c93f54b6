//! Error types for the vita_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vita_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential file exists but does not hold a valid credential mapping
    #[error("Corrupt credential store at {path:?}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    /// Registration attempted with an empty (or whitespace-only) username
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// Registration attempted with a username that is already taken
    #[error("Username '{0}' is already registered")]
    DuplicateUsername(String),

    /// Registration password and confirmation did not match
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Login attempted with a username that is not registered
    #[error("Username '{0}' not found")]
    UnknownUser(String),

    /// Login password did not match the stored digest
    #[error("Password incorrect")]
    WrongPassword,

    /// Gender value outside the recognized categories
    #[error("Unrecognized gender '{0}' (expected man/male or woman/female)")]
    InvalidGender(String),
}

impl Error {
    /// Whether this error is an expected user-input condition that the
    /// console layer should handle by re-prompting rather than aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EmptyUsername
                | Error::DuplicateUsername(_)
                | Error::PasswordMismatch
                | Error::UnknownUser(_)
                | Error::WrongPassword
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_recoverable() {
        assert!(Error::EmptyUsername.is_recoverable());
        assert!(Error::DuplicateUsername("alice".into()).is_recoverable());
        assert!(Error::PasswordMismatch.is_recoverable());
        assert!(Error::UnknownUser("bob".into()).is_recoverable());
        assert!(Error::WrongPassword.is_recoverable());
    }

    #[test]
    fn test_store_and_contract_failures_are_fatal() {
        let corrupt = Error::CorruptStore {
            path: PathBuf::from("users.json"),
            reason: "not a JSON object".into(),
        };
        assert!(!corrupt.is_recoverable());
        assert!(!Error::InvalidGender("alien".into()).is_recoverable());
    }
}
