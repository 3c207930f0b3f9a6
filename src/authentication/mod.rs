mod checker;
mod jwt;
mod middleware;
mod password;
mod password_validation;

pub use checker::{is_token_expired, is_user_authorized};
pub use jwt::{Claims, JwtAuthority, TokenError, TokenIdentity};
pub use middleware::CurrentUser;
pub use password::{AuthError, compute_password_hash, hash_password, verify_password};
pub use password_validation::{
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PasswordValidationError, validate_password,
    validate_password_length,
};
