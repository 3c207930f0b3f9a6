use crate::authentication::CurrentUser;
use crate::domain::{BlogDetails, PaginationFilter, PaginationQuery, UserDetails, UserUpdateData};
use crate::formatters::{Negotiated, OutputFormat};
use crate::services::ServiceError;
use crate::startup::AppState;
use crate::wrappers::{PagedResponse, Response};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

/// List users
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "user",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A page of users", body = PagedResponse<Vec<UserDetails>>),
    )
)]
#[tracing::instrument(name = "Get users", skip(state, format))]
pub async fn get_users(
    State(state): State<AppState>,
    format: OutputFormat,
    Query(query): Query<PaginationQuery>,
) -> Result<Negotiated<PagedResponse<Vec<UserDetails>>>, ServiceError> {
    let page = PaginationFilter::from(query);
    let users = state.user_service.get_users(page).await?;
    let total = state.user_service.get_user_count().await?;
    Ok(Negotiated::new(
        format,
        PagedResponse::new(users, page.page_number, page.page_size, total),
    ))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/api/user/{user_id}",
    tag = "user",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = Response<UserDetails>),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(name = "Get user", skip(state, format))]
pub async fn get_user(
    State(state): State<AppState>,
    format: OutputFormat,
    Path(user_id): Path<i32>,
) -> Result<Negotiated<Response<UserDetails>>, ServiceError> {
    let user = state.user_service.get_user_by_id(user_id).await?;
    Ok(Negotiated::new(format, Response::new(user)))
}

/// Update a user
///
/// Supplying a password logs out every other session of the account.
#[utoipa::path(
    put,
    path = "/api/user/{user_id}",
    tag = "user",
    params(("user_id" = i32, Path, description = "User identifier")),
    request_body = UserUpdateData,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User updated", body = Response<UserDetails>),
        (status = 400, description = "Invalid user data"),
        (status = 401, description = "Not authenticated or token expired"),
        (status = 403, description = "Caller is neither the user nor admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already taken"),
    )
)]
#[tracing::instrument(name = "Update user", skip(state, format, data), fields(caller = %current))]
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    format: OutputFormat,
    Path(user_id): Path<i32>,
    Json(data): Json<UserUpdateData>,
) -> Result<Negotiated<Response<UserDetails>>, ServiceError> {
    let user = state
        .user_service
        .update_user(&current, user_id, data)
        .await?;
    Ok(Negotiated::new(format, Response::new(user)))
}

/// Delete a user
///
/// The user's blogs are deleted with it.
#[utoipa::path(
    delete,
    path = "/api/user/{user_id}",
    tag = "user",
    params(("user_id" = i32, Path, description = "User identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Not authenticated or token expired"),
        (status = 403, description = "Caller is neither the user nor admin"),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(name = "Delete user", skip(state), fields(caller = %current))]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    if !state.user_service.delete_user(&current, user_id).await? {
        return Err(ServiceError::NotFound("Invalid Request.".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Search users
///
/// Case-insensitive match on username or full name.
#[utoipa::path(
    method(get, post),
    path = "/api/user/search/{search_param}",
    tag = "user",
    params(
        ("search_param" = String, Path, description = "Text to look for"),
        PaginationQuery,
    ),
    responses(
        (status = 200, description = "Matching users", body = PagedResponse<Vec<UserDetails>>),
    )
)]
#[tracing::instrument(name = "Search users", skip(state, format))]
pub async fn search_users(
    State(state): State<AppState>,
    format: OutputFormat,
    Path(search_param): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Negotiated<PagedResponse<Vec<UserDetails>>>, ServiceError> {
    let page = PaginationFilter::from(query);
    let users = state.user_service.search_users(page, &search_param).await?;
    let total = state
        .user_service
        .get_search_user_count(&search_param)
        .await?;
    Ok(Negotiated::new(
        format,
        PagedResponse::new(users, page.page_number, page.page_size, total),
    ))
}

/// List the blogs of a user
#[utoipa::path(
    get,
    path = "/api/user/{user_id}/blogs",
    tag = "user",
    params(
        ("user_id" = i32, Path, description = "Author identifier"),
        PaginationQuery,
    ),
    responses(
        (status = 200, description = "A page of the user's blogs", body = PagedResponse<Vec<BlogDetails>>),
    )
)]
#[tracing::instrument(name = "Get user blogs", skip(state, format))]
pub async fn get_user_blogs(
    State(state): State<AppState>,
    format: OutputFormat,
    Path(user_id): Path<i32>,
    Query(query): Query<PaginationQuery>,
) -> Result<Negotiated<PagedResponse<Vec<BlogDetails>>>, ServiceError> {
    let page = PaginationFilter::from(query);
    let blogs = state.user_service.get_user_blogs(page, user_id).await?;
    let total = state.user_service.get_user_blog_count(user_id).await?;
    Ok(Negotiated::new(
        format,
        PagedResponse::new(blogs, page.page_number, page.page_size, total),
    ))
}
