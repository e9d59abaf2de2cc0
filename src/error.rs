//! Errors that stop the binary before the event loop starts.
//!
//! Failures of remote operations never surface here: the store turns them into
//! its error slot (see `store::Operation::failure_message`).
//!
use std::path::PathBuf;

use thiserror::Error;

use crate::remote::ApiError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("build HTTP client: {0}")]
    Client(#[from] ApiError),

    #[error("init terminal: {0}")]
    Terminal(#[source] std::io::Error),
}

pub type Result<T, E = StartupError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_error_names_the_path_and_keeps_source() {
        let err = StartupError::LogFile {
            path: PathBuf::from("user-manager.log"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "open log file user-manager.log: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn api_error_converts_with_question_mark() {
        fn build() -> Result<()> {
            Err(ApiError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                url: "http://localhost/users".to_string(),
            })?;
            Ok(())
        }
        let err = build().unwrap_err();
        assert!(matches!(err, StartupError::Client(_)));
        assert!(err.to_string().starts_with("build HTTP client: "));
    }
}
