//! Persistence of users and blogs.
//!
//! Services only talk to the [`UserRepository`] and [`BlogRepository`]
//! traits; [`PostgresRepository`] backs production and
//! [`InMemoryRepository`] backs the test-suite and `storage: in_memory`.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryRepository;
pub use postgres::PostgresRepository;

use crate::domain::{Blog, PaginationFilter, Role, User};
use crate::telemetry::error_chain_fmt;
use chrono::{DateTime, Utc};
use secrecy::Secret;

#[derive(thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint was hit; carries the offending field name.
    #[error("The {0} is already taken.")]
    UniqueViolation(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: Secret<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get_users(&self, page: PaginationFilter) -> Result<Vec<User>, RepositoryError>;
    async fn get_user_count(&self) -> Result<i64, RepositoryError>;
    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_username(&self, username: &str)
    -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// Persists every mutable column of `user` and returns the stored row.
    async fn update_user(&self, user: User) -> Result<User, RepositoryError>;
    /// Returns `false` when nothing was deleted.
    async fn delete_user(&self, user_id: i32) -> Result<bool, RepositoryError>;
    async fn search_users(
        &self,
        query: &str,
        page: PaginationFilter,
    ) -> Result<Vec<User>, RepositoryError>;
    async fn get_search_user_count(&self, query: &str) -> Result<i64, RepositoryError>;
}

#[async_trait::async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create_blog(&self, blog: NewBlog) -> Result<Blog, RepositoryError>;
    async fn get_blogs(&self, page: PaginationFilter) -> Result<Vec<Blog>, RepositoryError>;
    async fn get_blog_count(&self) -> Result<i64, RepositoryError>;
    async fn get_blog_by_id(&self, blog_id: i32) -> Result<Option<Blog>, RepositoryError>;
    async fn update_blog(&self, blog: Blog) -> Result<Blog, RepositoryError>;
    async fn delete_blog(&self, blog_id: i32) -> Result<bool, RepositoryError>;
    async fn get_blogs_by_author(
        &self,
        author_id: i32,
        page: PaginationFilter,
    ) -> Result<Vec<Blog>, RepositoryError>;
    async fn get_blog_count_by_author(&self, author_id: i32) -> Result<i64, RepositoryError>;
}

/// Escapes `LIKE` wildcards so the search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
