use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
};

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Represents an API Error.
///
/// Serialized as `{"message": ..., "error": ...}`; the status travels as the HTTP status line.
///
/// # Examples
///
/// ```rust
/// # use settings_api::ApiError;
/// let err = ApiError::bad_request("Invalid request body", "expected an object");
/// assert_eq!(
///     serde_json::to_string(&err).unwrap(),
///     r#"{"message":"Invalid request body","error":"expected an object"}"#
/// );
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    message: String,
    error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Api Error({}) {}: {}", self.status.as_str(), self.message, self.error)
    }
}

impl StdError for ApiError {}

impl ApiError {
    #[inline]
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
            status,
        }
    }

    /// Summary of what failed, e.g. `"Failed to update settings"`.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Textual description of the underlying failure.
    #[inline]
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    #[inline]
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Replace the status. Used by clients, since the status isn't part of the body.
    #[inline]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[inline]
    #[must_use]
    pub fn matches_status(&self, status: StatusCode) -> bool {
        self.status == status
    }

    #[inline]
    pub fn bad_request(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, error.to_string())
    }

    /// A storage failure. Logged here so every failure is recorded exactly once.
    pub fn storage(message: impl Into<String>, error: impl Display) -> Self {
        let message = message.into();
        let error = error.to_string();
        tracing::error!(error = error.as_str(), "{}", message);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, error)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
