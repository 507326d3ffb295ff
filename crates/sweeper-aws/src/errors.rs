//! Mapping AWS SDK failures onto [`ApiError`].

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use sweeper_core::{ApiError, ApiErrorKind};

/// Error codes meaning the service or operation does not exist in this
/// region or partition.
const UNSUPPORTED_CODES: &[&str] = &[
    "UnsupportedOperation",
    "UnsupportedOperationException",
    "InvalidAction",
    "UnknownOperationException",
    "UnrecognizedClientException",
    "InvalidClientTokenId",
    "AuthFailure",
];

/// Message fragments with the same meaning, for services that answer with a
/// generic code.
const UNSUPPORTED_MESSAGES: &[&str] = &[
    "is not supported in this region",
    "not available in this region",
    "Unable to determine service/operation name to be authorized",
    "The security token included in the request is invalid",
];

const NOT_FOUND_CODES: &[&str] = &["NotFoundException", "ResourceNotFoundException"];

const ACCESS_DENIED_CODES: &[&str] = &["AccessDeniedException", "AccessDenied"];

const THROTTLED_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "LimitExceededException",
];

/// Classify a service error by its code and message.
pub fn classify_error(code: Option<&str>, message: &str) -> ApiErrorKind {
    let code = code.unwrap_or_default();

    if UNSUPPORTED_CODES.contains(&code)
        || UNSUPPORTED_MESSAGES.iter().any(|m| message.contains(m))
    {
        return ApiErrorKind::Unsupported;
    }
    if NOT_FOUND_CODES.contains(&code) {
        return ApiErrorKind::NotFound;
    }
    if ACCESS_DENIED_CODES.contains(&code) || message.contains("is not authorized to perform") {
        return ApiErrorKind::AccessDenied;
    }
    if THROTTLED_CODES.contains(&code) {
        return ApiErrorKind::Throttled;
    }
    ApiErrorKind::Other
}

/// Convert a failed SDK call into an [`ApiError`] for `operation`.
pub fn api_error<E, R>(operation: &str, err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
    R: Debug,
{
    let code = err.code().map(str::to_string);
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    let kind = classify_error(code.as_deref(), &message);

    let error = ApiError::new(kind, operation, message);
    match code {
        Some(code) => error.with_code(code),
        None => error,
    }
}
