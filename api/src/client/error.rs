use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Unable to parse url: {0}")]
    Url(#[from] url::ParseError),
    #[error("API error: {0}")]
    Api(#[from] crate::ApiError),
}

impl Error {
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    #[must_use]
    pub const fn as_api(&self) -> Option<&crate::ApiError> {
        if let Error::Api(api_error) = self {
            Some(api_error)
        } else {
            None
        }
    }

    #[must_use]
    pub fn matches_api_status(&self, status: StatusCode) -> bool {
        self.as_api()
            .map_or(false, |api_error| api_error.matches_status(status))
    }

    // Allow b/c destructor cannot be evaluated at compile time
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_api(self) -> Option<crate::ApiError> {
        if let Error::Api(api_error) = self {
            Some(api_error)
        } else {
            None
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
