use crate::authentication::CurrentUser;
use crate::domain::{LoginData, SignupData};
use crate::services::ServiceError;
use crate::startup::AppState;
use crate::wrappers::TokenResponse;
use axum::Json;
use axum::extract::State;

/// Sign up
///
/// Creates an account and returns a bearer token for it.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupData,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid signup data"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(name = "Signup request", skip(state, data), fields(username = %data.username))]
pub async fn signup(
    State(state): State<AppState>,
    Json(data): Json<SignupData>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let token = state.auth_service.signup(data).await?;
    Ok(Json(TokenResponse { token }))
}

/// Log in
///
/// Exchanges username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginData,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Invalid login data"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown username"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(name = "Login request", skip(state, data), fields(username = %data.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginData>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let token = state.auth_service.login(data).await?;
    Ok(Json(TokenResponse { token }))
}

/// Admin-only test endpoint
#[utoipa::path(
    get,
    path = "/api/auth/test",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller is an admin", body = String),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
#[tracing::instrument(name = "Admin test", skip(current), fields(caller = %current))]
pub async fn admin_test(current: CurrentUser) -> Result<&'static str, ServiceError> {
    if !current.role.is_admin() {
        return Err(ServiceError::Forbidden("You are not authorized.".into()));
    }
    Ok("Yo this is a test")
}
