use super::{BlogRepository, NewBlog, NewUser, RepositoryError, UserRepository, escape_like};
use crate::domain::{Blog, PaginationFilter, Role, User};
use anyhow::Context;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;

#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    username: String,
    full_name: String,
    email: String,
    password_hash: String,
    role: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    password_changed_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            password_hash: Secret::new(row.password_hash),
            role: Role::try_from(row.role).map_err(anyhow::Error::msg)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            password_changed_at: row.password_changed_at,
        })
    }
}

fn users_from_rows(rows: Vec<UserRow>) -> Result<Vec<User>, RepositoryError> {
    Ok(rows
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

fn user_from_row(row: Option<UserRow>) -> Result<Option<User>, RepositoryError> {
    Ok(row.map(User::try_from).transpose()?)
}

/// A blog joined with its author's username.
#[derive(sqlx::FromRow)]
struct BlogRow {
    blog_id: i32,
    title: String,
    description: String,
    author_id: i32,
    author_username: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Self {
            blog_id: row.blog_id,
            title: row.title,
            description: row.description,
            author_id: row.author_id,
            author_username: row.author_username,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Maps unique constraint violations on `users` to the offending field.
fn map_write_error(e: sqlx::Error, context: &'static str) -> RepositoryError {
    if let sqlx::Error::Database(db_error) = &e {
        if db_error.is_unique_violation() {
            let field = match db_error.constraint() {
                Some(constraint) if constraint.contains("email") => "email",
                Some(constraint) if constraint.contains("username") => "username",
                _ => "value",
            };
            return RepositoryError::UniqueViolation(field.to_string());
        }
    }
    RepositoryError::Unexpected(anyhow::Error::new(e).context(context))
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    #[tracing::instrument(name = "Insert user", skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (username, full_name, email, password_hash, role,
                 created_at, updated_at, password_changed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6, $6)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.password_hash.expose_secret())
        .bind(user.role.as_i32())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to insert a new user."))?;
        Ok(User::try_from(row)?)
    }

    #[tracing::instrument(name = "Fetch users", skip(self))]
    async fn get_users(&self, page: PaginationFilter) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users ORDER BY user_id ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch users.")?;
        users_from_rows(rows)
    }

    #[tracing::instrument(name = "Count users", skip(self))]
    async fn get_user_count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users.")?;
        Ok(count)
    }

    #[tracing::instrument(name = "Fetch user by id", skip(self))]
    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch a user by id.")?;
        user_from_row(row)
    }

    #[tracing::instrument(name = "Fetch user by username", skip(self))]
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch a user by username.")?;
        user_from_row(row)
    }

    #[tracing::instrument(name = "Fetch user by email", skip(self, email))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch a user by email.")?;
        user_from_row(row)
    }

    #[tracing::instrument(name = "Update user", skip(self, user), fields(user_id = user.user_id))]
    async fn update_user(&self, user: User) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET full_name = $2,
                email = $3,
                password_hash = $4,
                updated_at = $5,
                password_changed_at = $6
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user.user_id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.password_hash.expose_secret())
        .bind(user.updated_at)
        .bind(user.password_changed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update the user."))?;
        Ok(User::try_from(row)?)
    }

    #[tracing::instrument(name = "Delete user", skip(self))]
    async fn delete_user(&self, user_id: i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete the user.")?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Search users", skip(self))]
    async fn search_users(
        &self,
        query: &str,
        page: PaginationFilter,
    ) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT *
            FROM users
            WHERE username ILIKE $1 OR full_name ILIKE $1
            ORDER BY user_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(format!("%{}%", escape_like(query)))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to search users.")?;
        users_from_rows(rows)
    }

    #[tracing::instrument(name = "Count matching users", skip(self))]
    async fn get_search_user_count(&self, query: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE username ILIKE $1 OR full_name ILIKE $1",
        )
        .bind(format!("%{}%", escape_like(query)))
        .fetch_one(&self.pool)
        .await
        .context("Failed to count matching users.")?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl BlogRepository for PostgresRepository {
    #[tracing::instrument(name = "Insert blog", skip(self, blog), fields(author_id = blog.author_id))]
    async fn create_blog(&self, blog: NewBlog) -> Result<Blog, RepositoryError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            WITH inserted AS (
                INSERT INTO blogs (title, description, author_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                RETURNING *
            )
            SELECT i.blog_id, i.title, i.description, i.author_id,
                   u.username AS author_username, i.created_at, i.updated_at
            FROM inserted i
            INNER JOIN users u ON i.author_id = u.user_id
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.description)
        .bind(blog.author_id)
        .bind(blog.created_at)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert a new blog.")?;
        Ok(row.into())
    }

    #[tracing::instrument(name = "Fetch blogs", skip(self))]
    async fn get_blogs(&self, page: PaginationFilter) -> Result<Vec<Blog>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlogRow>(
            r#"
            SELECT b.blog_id, b.title, b.description, b.author_id,
                   u.username AS author_username, b.created_at, b.updated_at
            FROM blogs b
            INNER JOIN users u ON b.author_id = u.user_id
            ORDER BY b.created_at DESC, b.blog_id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch blogs.")?;
        Ok(rows.into_iter().map(Blog::from).collect())
    }

    #[tracing::instrument(name = "Count blogs", skip(self))]
    async fn get_blog_count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count blogs.")?;
        Ok(count)
    }

    #[tracing::instrument(name = "Fetch blog by id", skip(self))]
    async fn get_blog_by_id(&self, blog_id: i32) -> Result<Option<Blog>, RepositoryError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            SELECT b.blog_id, b.title, b.description, b.author_id,
                   u.username AS author_username, b.created_at, b.updated_at
            FROM blogs b
            INNER JOIN users u ON b.author_id = u.user_id
            WHERE b.blog_id = $1
            "#,
        )
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch a blog by id.")?;
        Ok(row.map(Blog::from))
    }

    #[tracing::instrument(name = "Update blog", skip(self, blog), fields(blog_id = blog.blog_id))]
    async fn update_blog(&self, blog: Blog) -> Result<Blog, RepositoryError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            WITH updated AS (
                UPDATE blogs
                SET title = $2, description = $3, updated_at = $4
                WHERE blog_id = $1
                RETURNING *
            )
            SELECT d.blog_id, d.title, d.description, d.author_id,
                   u.username AS author_username, d.created_at, d.updated_at
            FROM updated d
            INNER JOIN users u ON d.author_id = u.user_id
            "#,
        )
        .bind(blog.blog_id)
        .bind(&blog.title)
        .bind(&blog.description)
        .bind(blog.updated_at)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update the blog.")?;
        row.map(Blog::from)
            .ok_or_else(|| anyhow::anyhow!("Blog {} does not exist.", blog.blog_id).into())
    }

    #[tracing::instrument(name = "Delete blog", skip(self))]
    async fn delete_blog(&self, blog_id: i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM blogs WHERE blog_id = $1")
            .bind(blog_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete the blog.")?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Fetch blogs by author", skip(self))]
    async fn get_blogs_by_author(
        &self,
        author_id: i32,
        page: PaginationFilter,
    ) -> Result<Vec<Blog>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlogRow>(
            r#"
            SELECT b.blog_id, b.title, b.description, b.author_id,
                   u.username AS author_username, b.created_at, b.updated_at
            FROM blogs b
            INNER JOIN users u ON b.author_id = u.user_id
            WHERE b.author_id = $1
            ORDER BY b.created_at DESC, b.blog_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch blogs of an author.")?;
        Ok(rows.into_iter().map(Blog::from).collect())
    }

    #[tracing::instrument(name = "Count blogs by author", skip(self))]
    async fn get_blog_count_by_author(&self, author_id: i32) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count blogs of an author.")?;
        Ok(count)
    }
}
