use crate::errors::SweeperError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Sweeper '{name}' is already registered")]
    Duplicate { name: String },

    #[error("Unknown sweeper '{name}'. Available: {available}")]
    UnknownSweeper { name: String, available: String },
}

impl SweeperError for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::Duplicate { .. } => "DUPLICATE_SWEEPER",
            RegistryError::UnknownSweeper { .. } => "UNKNOWN_SWEEPER",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, RegistryError::UnknownSweeper { .. })
    }
}
