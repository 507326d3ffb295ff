use serde::Serialize;

use crate::errors::SweeperError;

/// Coarse classification of a provisioning API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The resource does not exist (or no longer exists).
    NotFound,
    /// The caller's credentials are not allowed to perform the operation.
    AccessDenied,
    /// The service or operation is not available in this region/account.
    Unsupported,
    Throttled,
    Other,
}

/// A failed list, describe, or delete call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{operation}: {message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    operation: String,
    code: Option<String>,
    message: String,
}

impl ApiError {
    pub fn new(
        kind: ApiErrorKind,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            operation: operation.into(),
            code: None,
            message: message.into(),
        }
    }

    pub fn not_found(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, operation, message)
    }

    pub fn access_denied(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::AccessDenied, operation, message)
    }

    pub fn other(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Other, operation, message)
    }

    /// Attach the service's error code (e.g. `NotFoundException`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    pub fn is_access_denied(&self) -> bool {
        self.kind == ApiErrorKind::AccessDenied
    }

    /// Listing failures of this kind skip the whole region instead of failing it.
    pub fn is_skip_region(&self) -> bool {
        self.kind == ApiErrorKind::Unsupported
    }
}

impl SweeperError for ApiError {
    fn error_code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::NotFound => "API_NOT_FOUND",
            ApiErrorKind::AccessDenied => "API_ACCESS_DENIED",
            ApiErrorKind::Unsupported => "API_UNSUPPORTED",
            ApiErrorKind::Throttled => "API_THROTTLED",
            ApiErrorKind::Other => "API_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        self.kind == ApiErrorKind::AccessDenied
    }
}
