mod blog;
mod pagination;
mod role;
mod user;
pub mod validation;

pub use blog::{Blog, BlogDetails, BlogUpdateData, NewBlogData};
pub use pagination::{
    DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginationFilter, PaginationQuery,
};
pub use role::Role;
pub use user::{LoginData, SignupData, User, UserDetails, UserUpdateData};
pub use validation::{DtoValidationError, validate_dto};
