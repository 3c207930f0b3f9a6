use super::{ServiceError, ensure_token_is_current};
use crate::authentication::{CurrentUser, hash_password, is_user_authorized};
use crate::domain::{BlogDetails, PaginationFilter, UserDetails, UserUpdateData, validate_dto};
use crate::repository::{BlogRepository, UserRepository};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    blogs: Arc<dyn BlogRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, blogs: Arc<dyn BlogRepository>) -> Self {
        Self { users, blogs }
    }

    #[tracing::instrument(name = "List users", skip(self))]
    pub async fn get_users(
        &self,
        page: PaginationFilter,
    ) -> Result<Vec<UserDetails>, ServiceError> {
        let users = self.users.get_users(page).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Count users", skip(self))]
    pub async fn get_user_count(&self) -> Result<i64, ServiceError> {
        Ok(self.users.get_user_count().await?)
    }

    #[tracing::instrument(name = "Get user", skip(self))]
    pub async fn get_user_by_id(&self, user_id: i32) -> Result<UserDetails, ServiceError> {
        self.users
            .get_user_by_id(user_id)
            .await?
            .map(Into::into)
            .ok_or_else(ServiceError::user_not_found)
    }

    #[tracing::instrument(name = "Get user by username", skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<UserDetails, ServiceError> {
        self.users
            .get_user_by_username(username)
            .await?
            .map(Into::into)
            .ok_or_else(ServiceError::user_not_found)
    }

    /// Replaces full name and email, and the password when one is given.
    ///
    /// A new password moves `password_changed_at`, which invalidates every
    /// token issued before it, including the caller's.
    #[tracing::instrument(name = "Update user", skip(self, data), fields(caller = %current))]
    pub async fn update_user(
        &self,
        current: &CurrentUser,
        user_id: i32,
        data: UserUpdateData,
    ) -> Result<UserDetails, ServiceError> {
        validate_dto(&data)?;

        let mut user = self
            .users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;
        if !is_user_authorized(current, user.user_id) {
            return Err(ServiceError::not_authorized());
        }
        ensure_token_is_current(self.users.as_ref(), current).await?;

        let now = Utc::now();
        user.full_name = data.full_name;
        user.email = data.email;
        user.updated_at = now;
        if let Some(password) = data.password {
            user.password_hash = hash_password(password).await?;
            user.password_changed_at = now;
        }

        let user = self.users.update_user(user).await?;
        Ok(user.into())
    }

    #[tracing::instrument(name = "Delete user", skip(self), fields(caller = %current))]
    pub async fn delete_user(
        &self,
        current: &CurrentUser,
        user_id: i32,
    ) -> Result<bool, ServiceError> {
        let user = self
            .users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;
        if !is_user_authorized(current, user.user_id) {
            return Err(ServiceError::not_authorized());
        }
        ensure_token_is_current(self.users.as_ref(), current).await?;

        Ok(self.users.delete_user(user_id).await?)
    }

    #[tracing::instrument(name = "Search users", skip(self))]
    pub async fn search_users(
        &self,
        page: PaginationFilter,
        query: &str,
    ) -> Result<Vec<UserDetails>, ServiceError> {
        let users = self.users.search_users(query, page).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Count matching users", skip(self))]
    pub async fn get_search_user_count(&self, query: &str) -> Result<i64, ServiceError> {
        Ok(self.users.get_search_user_count(query).await?)
    }

    #[tracing::instrument(name = "List blogs of user", skip(self))]
    pub async fn get_user_blogs(
        &self,
        page: PaginationFilter,
        user_id: i32,
    ) -> Result<Vec<BlogDetails>, ServiceError> {
        let blogs = self.blogs.get_blogs_by_author(user_id, page).await?;
        Ok(blogs.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Count blogs of user", skip(self))]
    pub async fn get_user_blog_count(&self, user_id: i32) -> Result<i64, ServiceError> {
        Ok(self.blogs.get_blog_count_by_author(user_id).await?)
    }
}
