use crate::domain::Role;
use crate::services::ServiceError;
use crate::startup::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use chrono::{DateTime, Utc};

/// The authenticated caller, taken from a verified bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

impl std::fmt::Display for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.username, self.user_id)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| authentication_required())?;

        let identity = state.jwt.verify(bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            authentication_required()
        })?;

        Ok(CurrentUser {
            user_id: identity.user_id,
            username: identity.username,
            role: identity.role,
            issued_at: identity.issued_at,
        })
    }
}

fn authentication_required() -> ServiceError {
    ServiceError::Unauthorized("Authentication required.".into())
}
