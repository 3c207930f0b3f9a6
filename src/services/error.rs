use crate::domain::DtoValidationError;
use crate::repository::RepositoryError;
use crate::telemetry::error_chain_fmt;
use crate::wrappers::Response;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[derive(thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn user_not_found() -> Self {
        ServiceError::NotFound("User not found.".into())
    }

    pub(crate) fn blog_not_found() -> Self {
        ServiceError::NotFound("Blog not found.".into())
    }

    pub(crate) fn not_authorized() -> Self {
        ServiceError::Forbidden("You are not authorized.".into())
    }

    pub(crate) fn token_expired() -> Self {
        ServiceError::Unauthorized("Token is expired. Log in again.".into())
    }
}

impl From<DtoValidationError> for ServiceError {
    fn from(e: DtoValidationError) -> Self {
        ServiceError::BadRequest(e.0)
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::UniqueViolation(field) => {
                ServiceError::Conflict(format!("The {field} is already taken."))
            }
            RepositoryError::Unexpected(e) => ServiceError::UnexpectedError(e),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        if let ServiceError::UnexpectedError(e) = &self {
            tracing::error!(error.cause_chain = ?e, error.message = %e, "Unexpected error");
        }
        (self.status_code(), Json(Response::<()>::failure(self.to_string()))).into_response()
    }
}
