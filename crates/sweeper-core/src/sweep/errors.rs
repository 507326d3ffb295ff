use crate::clients::ClientError;
use crate::errors::SweeperError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SweepError {
    /// No client, so nothing in the region could be attempted.
    #[error("getting client for {resource_type} ({region}): {source}")]
    Client {
        resource_type: String,
        region: String,
        #[source]
        source: ClientError,
    },

    /// One or more stages failed; `details` holds every failure, one per line.
    #[error("{count} failure(s) sweeping {resource_type} ({region}):\n{details}")]
    Failed {
        resource_type: String,
        region: String,
        count: usize,
        details: String,
    },
}

impl SweeperError for SweepError {
    fn error_code(&self) -> &'static str {
        match self {
            SweepError::Client { .. } => "SWEEP_CLIENT_FAILED",
            SweepError::Failed { .. } => "SWEEP_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            SweepError::Client { source, .. } => source.is_user_error(),
            SweepError::Failed { .. } => false,
        }
    }
}
