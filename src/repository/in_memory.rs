//! In-memory storage for tests and local development.

use super::{BlogRepository, NewBlog, NewUser, RepositoryError, UserRepository};
use crate::domain::{Blog, PaginationFilter, User};
use anyhow::anyhow;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    blogs: BTreeMap<i32, Blog>,
    last_user_id: i32,
    last_blog_id: i32,
}

/// Keeps users and blogs behind one lock so that cascading deletes and
/// uniqueness checks stay atomic.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e).into())
    }
}

fn page_of<T: Clone>(items: Vec<&T>, page: PaginationFilter) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).cloned().collect()
}

fn newest_first(blogs: &mut [&Blog]) {
    blogs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.blog_id.cmp(&a.blog_id))
    });
}

fn matches_search(user: &User, needle: &str) -> bool {
    user.username.to_lowercase().contains(needle)
        || user.full_name.to_lowercase().contains(needle)
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl UserRepository for InMemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::UniqueViolation("username".into()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation("email".into()));
        }

        tables.last_user_id += 1;
        let user = User {
            user_id: tables.last_user_id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.created_at,
            password_changed_at: user.created_at,
        };
        tables.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn get_users(&self, page: PaginationFilter) -> Result<Vec<User>, RepositoryError> {
        let tables = self.read()?;
        Ok(page_of(tables.users.values().collect(), page))
    }

    async fn get_user_count(&self) -> Result<i64, RepositoryError> {
        Ok(count(self.read()?.users.len()))
    }

    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.users.get(&user_id).cloned())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.read()?;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.read()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut tables = self.write()?;
        if tables
            .users
            .values()
            .any(|u| u.user_id != user.user_id && u.email == user.email)
        {
            return Err(RepositoryError::UniqueViolation("email".into()));
        }
        let stored = tables
            .users
            .get_mut(&user.user_id)
            .ok_or_else(|| anyhow!("User {} does not exist.", user.user_id))?;
        stored.full_name = user.full_name;
        stored.email = user.email;
        stored.password_hash = user.password_hash;
        stored.updated_at = user.updated_at;
        stored.password_changed_at = user.password_changed_at;
        Ok(stored.clone())
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, RepositoryError> {
        let mut tables = self.write()?;
        if tables.users.remove(&user_id).is_none() {
            return Ok(false);
        }
        tables.blogs.retain(|_, blog| blog.author_id != user_id);
        Ok(true)
    }

    async fn search_users(
        &self,
        query: &str,
        page: PaginationFilter,
    ) -> Result<Vec<User>, RepositoryError> {
        let needle = query.to_lowercase();
        let tables = self.read()?;
        let matching = tables
            .users
            .values()
            .filter(|u| matches_search(u, &needle))
            .collect();
        Ok(page_of(matching, page))
    }

    async fn get_search_user_count(&self, query: &str) -> Result<i64, RepositoryError> {
        let needle = query.to_lowercase();
        let tables = self.read()?;
        Ok(count(
            tables
                .users
                .values()
                .filter(|u| matches_search(u, &needle))
                .count(),
        ))
    }
}

#[async_trait::async_trait]
impl BlogRepository for InMemoryRepository {
    async fn create_blog(&self, blog: NewBlog) -> Result<Blog, RepositoryError> {
        let mut tables = self.write()?;
        let author_username = tables
            .users
            .get(&blog.author_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| anyhow!("Author {} does not exist.", blog.author_id))?;

        tables.last_blog_id += 1;
        let blog = Blog {
            blog_id: tables.last_blog_id,
            title: blog.title,
            description: blog.description,
            author_id: blog.author_id,
            author_username,
            created_at: blog.created_at,
            updated_at: blog.created_at,
        };
        tables.blogs.insert(blog.blog_id, blog.clone());
        Ok(blog)
    }

    async fn get_blogs(&self, page: PaginationFilter) -> Result<Vec<Blog>, RepositoryError> {
        let tables = self.read()?;
        let mut blogs: Vec<&Blog> = tables.blogs.values().collect();
        newest_first(&mut blogs);
        Ok(page_of(blogs, page))
    }

    async fn get_blog_count(&self) -> Result<i64, RepositoryError> {
        Ok(count(self.read()?.blogs.len()))
    }

    async fn get_blog_by_id(&self, blog_id: i32) -> Result<Option<Blog>, RepositoryError> {
        Ok(self.read()?.blogs.get(&blog_id).cloned())
    }

    async fn update_blog(&self, blog: Blog) -> Result<Blog, RepositoryError> {
        let mut tables = self.write()?;
        let stored = tables
            .blogs
            .get_mut(&blog.blog_id)
            .ok_or_else(|| anyhow!("Blog {} does not exist.", blog.blog_id))?;
        stored.title = blog.title;
        stored.description = blog.description;
        stored.updated_at = blog.updated_at;
        Ok(stored.clone())
    }

    async fn delete_blog(&self, blog_id: i32) -> Result<bool, RepositoryError> {
        Ok(self.write()?.blogs.remove(&blog_id).is_some())
    }

    async fn get_blogs_by_author(
        &self,
        author_id: i32,
        page: PaginationFilter,
    ) -> Result<Vec<Blog>, RepositoryError> {
        let tables = self.read()?;
        let mut blogs: Vec<&Blog> = tables
            .blogs
            .values()
            .filter(|b| b.author_id == author_id)
            .collect();
        newest_first(&mut blogs);
        Ok(page_of(blogs, page))
    }

    async fn get_blog_count_by_author(&self, author_id: i32) -> Result<i64, RepositoryError> {
        let tables = self.read()?;
        Ok(count(
            tables
                .blogs
                .values()
                .filter(|b| b.author_id == author_id)
                .count(),
        ))
    }
}
