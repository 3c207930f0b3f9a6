pub mod auth;
pub mod blog;
pub mod health_check; // Public for OpenAPI annotations
pub mod user;

pub use health_check::health_check;
