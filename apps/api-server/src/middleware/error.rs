//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use blog_core::error::{DomainError, RepoError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Unparseable request body.
    BadRequest(String),
    Malformed(String),
    Validation(String),
    InvalidReference(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Malformed(msg) => write!(f, "Malformed id: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::InvalidReference(msg) => write!(f, "Invalid reference: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Malformed(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request("bad_request", detail),
            AppError::Malformed(detail) => ErrorResponse::bad_request("malformed_id", detail),
            AppError::Validation(detail) => {
                ErrorResponse::bad_request("validation_failed", detail)
            }
            AppError::InvalidReference(detail) => {
                ErrorResponse::unprocessable("invalid_reference", detail)
            }
            AppError::Internal(detail) => {
                // The only place storage faults are logged; the body hides the detail.
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::InvalidReference { entity_type, id } => {
                AppError::InvalidReference(format!("{} with id {} does not exist", entity_type, id))
            }
            DomainError::Malformed { entity_type, value } => {
                AppError::Malformed(format!("{:?} is not a valid {} id", value, entity_type))
            }
            DomainError::Storage(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                AppError::Internal(format!("Database constraint violation: {}", msg))
            }
            RepoError::Connection(msg) => {
                AppError::Internal(format!("Database connection error: {}", msg))
            }
            RepoError::Query(msg) => AppError::Internal(format!("Database query error: {}", msg)),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    tracing::debug!("{} {} Not Found", req.method(), req.path());
    HttpResponse::NotFound().json(ErrorResponse::not_found("Route not found"))
}
