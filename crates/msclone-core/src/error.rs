//! Error types for msclone.

use thiserror::Error;

/// Result type alias using msclone's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for clone operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A precondition failed before any table or file was touched
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The source tenant owns no tables
    #[error("No tables found: {0}")]
    NoTables(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// External collaborator command failed
    #[error("Command error: {0}")]
    Command(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the operation aborted before mutating any table or file.
    ///
    /// Covers argument validation, platform/tenant checks, and the
    /// "no tables found" scan result.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition(_) | Error::NoTables(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_precondition() {
        let err = Error::Precondition("Can't clone the site to itself.".to_string());
        assert_eq!(
            err.to_string(),
            "Precondition failed: Can't clone the site to itself."
        );
    }

    #[test]
    fn test_error_display_no_tables() {
        let err = Error::NoTables("wp_9_".to_string());
        assert_eq!(err.to_string(), "No tables found: wp_9_");
    }

    #[test]
    fn test_error_display_command() {
        let err = Error::Command("wp exited with status 1".to_string());
        assert_eq!(err.to_string(), "Command error: wp exited with status 1");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("bad table".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad table");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing DATABASE_URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing DATABASE_URL");
    }

    #[test]
    fn test_is_precondition() {
        assert!(Error::Precondition("x".into()).is_precondition());
        assert!(Error::NoTables("x".into()).is_precondition());
        assert!(!Error::Command("x".into()).is_precondition());
        assert!(!Error::Internal("x".into()).is_precondition());
        assert!(!Error::InvalidInput("x".into()).is_precondition());
        assert!(!Error::Config("x".into()).is_precondition());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
