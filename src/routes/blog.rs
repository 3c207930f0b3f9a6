use crate::authentication::CurrentUser;
use crate::domain::{BlogDetails, BlogUpdateData, NewBlogData, PaginationFilter, PaginationQuery};
use crate::formatters::{Negotiated, OutputFormat};
use crate::services::ServiceError;
use crate::startup::AppState;
use crate::wrappers::{PagedResponse, Response};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

/// List blogs
///
/// Newest first, one page at a time.
#[utoipa::path(
    get,
    path = "/api/blog",
    tag = "blog",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A page of blogs", body = PagedResponse<Vec<BlogDetails>>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(name = "Get blogs", skip(state, format))]
pub async fn get_blogs(
    State(state): State<AppState>,
    format: OutputFormat,
    Query(query): Query<PaginationQuery>,
) -> Result<Negotiated<PagedResponse<Vec<BlogDetails>>>, ServiceError> {
    let page = PaginationFilter::from(query);
    let blogs = state.blog_service.get_blogs(page).await?;
    let total = state.blog_service.get_blog_count().await?;
    Ok(Negotiated::new(
        format,
        PagedResponse::new(blogs, page.page_number, page.page_size, total),
    ))
}

/// Post a blog
#[utoipa::path(
    post,
    path = "/api/blog",
    tag = "blog",
    request_body = NewBlogData,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blog created", body = Response<BlogDetails>),
        (status = 400, description = "Invalid blog data"),
        (status = 401, description = "Not authenticated or token expired"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(name = "Post blog", skip(state, format, data), fields(caller = %current))]
pub async fn post_blog(
    State(state): State<AppState>,
    current: CurrentUser,
    format: OutputFormat,
    Json(data): Json<NewBlogData>,
) -> Result<Negotiated<Response<BlogDetails>>, ServiceError> {
    let blog = state.blog_service.post_blog(&current, data).await?;
    Ok(Negotiated::new(format, Response::new(blog)))
}

/// Get a blog
#[utoipa::path(
    get,
    path = "/api/blog/{blog_id}",
    tag = "blog",
    params(("blog_id" = i32, Path, description = "Blog identifier")),
    responses(
        (status = 200, description = "Blog found", body = Response<BlogDetails>),
        (status = 404, description = "Blog not found"),
    )
)]
#[tracing::instrument(name = "Get blog", skip(state, format))]
pub async fn get_blog(
    State(state): State<AppState>,
    format: OutputFormat,
    Path(blog_id): Path<i32>,
) -> Result<Negotiated<Response<BlogDetails>>, ServiceError> {
    let blog = state.blog_service.get_blog_by_id(blog_id).await?;
    Ok(Negotiated::new(format, Response::new(blog)))
}

/// Update a blog
///
/// Only the author or an admin may update.
#[utoipa::path(
    put,
    path = "/api/blog/{blog_id}",
    tag = "blog",
    params(("blog_id" = i32, Path, description = "Blog identifier")),
    request_body = BlogUpdateData,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blog updated", body = Response<BlogDetails>),
        (status = 400, description = "Invalid blog data"),
        (status = 401, description = "Not authenticated or token expired"),
        (status = 403, description = "Caller is neither author nor admin"),
        (status = 404, description = "Blog not found"),
    )
)]
#[tracing::instrument(name = "Update blog", skip(state, format, data), fields(caller = %current))]
pub async fn update_blog(
    State(state): State<AppState>,
    current: CurrentUser,
    format: OutputFormat,
    Path(blog_id): Path<i32>,
    Json(data): Json<BlogUpdateData>,
) -> Result<Negotiated<Response<BlogDetails>>, ServiceError> {
    let blog = state
        .blog_service
        .update_blog(&current, blog_id, data)
        .await?;
    Ok(Negotiated::new(format, Response::new(blog)))
}

/// Delete a blog
#[utoipa::path(
    delete,
    path = "/api/blog/{blog_id}",
    tag = "blog",
    params(("blog_id" = i32, Path, description = "Blog identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Not authenticated or token expired"),
        (status = 403, description = "Caller is neither author nor admin"),
        (status = 404, description = "Blog not found"),
    )
)]
#[tracing::instrument(name = "Delete blog", skip(state), fields(caller = %current))]
pub async fn delete_blog(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(blog_id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    if !state.blog_service.delete_blog(&current, blog_id).await? {
        return Err(ServiceError::NotFound("Invalid Request.".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
