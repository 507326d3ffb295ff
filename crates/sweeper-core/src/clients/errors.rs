use crate::errors::SweeperError;

/// Failure to build a regional client. Cloned to every caller waiting on the
/// same creation attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid region '{region}': {message}")]
    InvalidRegion { region: String, message: String },

    #[error("Failed to set up client for region '{region}': {message}")]
    SetupFailed { region: String, message: String },
}

impl SweeperError for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            ClientError::InvalidRegion { .. } => "CLIENT_INVALID_REGION",
            ClientError::SetupFailed { .. } => "CLIENT_SETUP_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ClientError::InvalidRegion { .. })
    }
}
