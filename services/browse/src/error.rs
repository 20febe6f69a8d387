//! Error types for the browse service

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use layout::LayoutError;
use repository::RepositoryError;

/// Result type for browse handlers
pub type BrowseResult<T> = Result<T, BrowseError>;

/// Errors surfaced by the browse service
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    /// Browsing or artifact lookup failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Layout or formatter lookup failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The query string is missing a parameter or could not be parsed
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryRejection),
}

/// Body message shared by every browse miss, so that a miss does not reveal
/// which of storage, repository or path was absent.
const NOT_FOUND_MESSAGE: &str = "the requested resource was not found";

impl BrowseError {
    /// Is this a storage, repository or path miss?
    pub fn is_not_found(&self) -> bool {
        match self {
            BrowseError::Repository(err) => err.is_not_found(),
            BrowseError::Layout(_) | BrowseError::InvalidQuery(_) => false,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BrowseError::Repository(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            BrowseError::Repository(RepositoryError::PolicyViolation { .. }) => StatusCode::FORBIDDEN,
            BrowseError::Repository(
                RepositoryError::InvalidArtifactPath(_) | RepositoryError::CoordinatesMismatch(_),
            ) => StatusCode::BAD_REQUEST,
            BrowseError::Repository(RepositoryError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            BrowseError::Repository(_) => StatusCode::BAD_REQUEST,
            BrowseError::Layout(LayoutError::ProviderNotFound(_)) => StatusCode::NOT_FOUND,
            BrowseError::Layout(_) | BrowseError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the machine readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            BrowseError::Repository(err) if err.is_not_found() => "NOT_FOUND",
            BrowseError::Repository(RepositoryError::PolicyViolation { .. }) => "DENIED",
            BrowseError::Repository(RepositoryError::InvalidArtifactPath(_))
            | BrowseError::Layout(LayoutError::InvalidArtifactPath(_)) => "ARTIFACT_PATH_INVALID",
            BrowseError::Repository(RepositoryError::CoordinatesMismatch(_))
            | BrowseError::Layout(LayoutError::CoordinatesMismatch(_)) => "LAYOUT_MISMATCH",
            BrowseError::Layout(LayoutError::ProviderNotFound(_)) => "PROVIDER_UNKNOWN",
            BrowseError::Repository(RepositoryError::Storage(_)) => "STORAGE_FAILED",
            BrowseError::InvalidQuery(_) => "QUERY_INVALID",
            BrowseError::Repository(_) => "UNKNOWN",
        }
    }

    fn message(&self) -> String {
        if self.is_not_found() {
            NOT_FOUND_MESSAGE.to_owned()
        } else if self.status_code().is_server_error() {
            "internal error".to_owned()
        } else {
            self.to_string()
        }
    }
}

/// Error response body
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, serde::Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for BrowseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = &self as &dyn std::error::Error, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request refused");
        }

        let body = ErrorResponse {
            errors: vec![ErrorDetail {
                code: self.error_code(),
                message: self.message(),
            }],
        };

        (status, axum::Json(body)).into_response()
    }
}
