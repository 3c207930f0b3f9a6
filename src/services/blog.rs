use super::{ServiceError, ensure_token_is_current};
use crate::authentication::{CurrentUser, is_user_authorized};
use crate::domain::{BlogDetails, BlogUpdateData, NewBlogData, PaginationFilter, validate_dto};
use crate::repository::{BlogRepository, NewBlog, UserRepository};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { blogs, users }
    }

    #[tracing::instrument(name = "Post blog", skip(self, data), fields(author = %current))]
    pub async fn post_blog(
        &self,
        current: &CurrentUser,
        data: NewBlogData,
    ) -> Result<BlogDetails, ServiceError> {
        validate_dto(&data)?;
        ensure_token_is_current(self.users.as_ref(), current).await?;

        let blog = self
            .blogs
            .create_blog(NewBlog {
                title: data.title,
                description: data.description,
                author_id: current.user_id,
                created_at: Utc::now(),
            })
            .await?;
        Ok(blog.into())
    }

    #[tracing::instrument(name = "List blogs", skip(self))]
    pub async fn get_blogs(
        &self,
        page: PaginationFilter,
    ) -> Result<Vec<BlogDetails>, ServiceError> {
        let blogs = self.blogs.get_blogs(page).await?;
        Ok(blogs.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Count blogs", skip(self))]
    pub async fn get_blog_count(&self) -> Result<i64, ServiceError> {
        Ok(self.blogs.get_blog_count().await?)
    }

    #[tracing::instrument(name = "Get blog", skip(self))]
    pub async fn get_blog_by_id(&self, blog_id: i32) -> Result<BlogDetails, ServiceError> {
        self.blogs
            .get_blog_by_id(blog_id)
            .await?
            .map(Into::into)
            .ok_or_else(ServiceError::blog_not_found)
    }

    #[tracing::instrument(name = "Update blog", skip(self, data), fields(caller = %current))]
    pub async fn update_blog(
        &self,
        current: &CurrentUser,
        blog_id: i32,
        data: BlogUpdateData,
    ) -> Result<BlogDetails, ServiceError> {
        validate_dto(&data)?;

        let mut blog = self
            .blogs
            .get_blog_by_id(blog_id)
            .await?
            .ok_or_else(ServiceError::blog_not_found)?;
        if !is_user_authorized(current, blog.author_id) {
            return Err(ServiceError::not_authorized());
        }
        ensure_token_is_current(self.users.as_ref(), current).await?;

        blog.title = data.title;
        blog.description = data.description;
        blog.updated_at = Utc::now();
        let blog = self.blogs.update_blog(blog).await?;
        Ok(blog.into())
    }

    /// Returns `false` when the blog disappeared before it could be deleted.
    #[tracing::instrument(name = "Delete blog", skip(self), fields(caller = %current))]
    pub async fn delete_blog(
        &self,
        current: &CurrentUser,
        blog_id: i32,
    ) -> Result<bool, ServiceError> {
        let blog = self
            .blogs
            .get_blog_by_id(blog_id)
            .await?
            .ok_or_else(ServiceError::blog_not_found)?;
        if !is_user_authorized(current, blog.author_id) {
            return Err(ServiceError::not_authorized());
        }
        ensure_token_is_current(self.users.as_ref(), current).await?;

        Ok(self.blogs.delete_blog(blog_id).await?)
    }
}
