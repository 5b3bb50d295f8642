//! Listing failures

use axum::http::StatusCode;
use thiserror::Error;

/// Why a listing request could not be served
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// `page` was not a positive integer
    #[error("Invalid page parameter")]
    InvalidPage,

    /// `size` was not an integer in range
    #[error("Invalid size parameter. Must be between 1 and 100")]
    InvalidSize,

    /// `sort` named an unknown field
    #[error("Invalid sort field. Valid fields: name, id")]
    InvalidSort,

    /// Something went wrong building the response; the detail stays server-side
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl ListingError {
    /// HTTP status for this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            ListingError::InvalidPage | ListingError::InvalidSize | ListingError::InvalidSort => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ListingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ListingError::Internal(_) => "INTERNAL_SERVER_ERROR",
            _ => "VALIDATION_ERROR",
        }
    }

    /// Message shown to API clients
    pub fn public_message(&self) -> String {
        match self {
            ListingError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ListingError::InvalidPage.public_message(),
            "Invalid page parameter"
        );
        assert_eq!(
            ListingError::InvalidSize.public_message(),
            "Invalid size parameter. Must be between 1 and 100"
        );
        assert_eq!(
            ListingError::InvalidSort.public_message(),
            "Invalid sort field. Valid fields: name, id"
        );
    }

    #[test]
    fn test_internal_failure_hides_detail() {
        let err = ListingError::Internal("relative URL without a base".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_validation_errors_are_unprocessable() {
        for err in [
            ListingError::InvalidPage,
            ListingError::InvalidSize,
            ListingError::InvalidSort,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(err.code(), "VALIDATION_ERROR");
        }
    }
}
