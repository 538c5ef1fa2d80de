//! Error types for linebolt.

use crate::config::ConfigError;
use crate::report::ReportError;
use crate::walker::WalkError;

/// Top-level error type for linebolt operations.
#[derive(Debug, thiserror::Error)]
pub enum LineboltError {
    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &LineboltError) -> i32 {
    match error {
        LineboltError::Walk(WalkError::NotFound { .. }) => 3,
        LineboltError::Walk(WalkError::PermissionDenied { .. }) => 4,
        LineboltError::Walk(_) => 2,
        LineboltError::Config(_) => 1,
        LineboltError::Report(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let not_found = LineboltError::from(WalkError::NotFound {
            path: PathBuf::from("missing"),
        });
        assert_eq!(exit_code(&not_found), 3);

        let denied = LineboltError::from(WalkError::PermissionDenied {
            path: PathBuf::from("locked"),
        });
        assert_eq!(exit_code(&denied), 4);

        let not_dir = LineboltError::from(WalkError::NotADirectory {
            path: PathBuf::from("main.c"),
        });
        assert_eq!(exit_code(&not_dir), 2);

        let config = LineboltError::from(ConfigError::EmptyExtension);
        assert_eq!(exit_code(&config), 1);
    }

    #[test]
    fn test_error_message_names_path() {
        let err = LineboltError::from(WalkError::NotFound {
            path: PathBuf::from("/nowhere"),
        });
        assert_eq!(err.to_string(), "walk error: path not found: /nowhere");
    }
}
