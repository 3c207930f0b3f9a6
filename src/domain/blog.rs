use crate::domain::validation::not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Blog {
    pub blog_id: i32,
    pub title: String,
    pub description: String,
    pub author_id: i32,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogData {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000), custom(function = "not_blank"))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogUpdateData {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000), custom(function = "not_blank"))]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetails {
    pub blog_id: i32,
    pub title: String,
    pub description: String,
    pub author_id: i32,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Blog> for BlogDetails {
    fn from(blog: Blog) -> Self {
        Self {
            blog_id: blog.blog_id,
            title: blog.title,
            description: blog.description,
            author_id: blog.author_id,
            author_username: blog.author_username,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}
