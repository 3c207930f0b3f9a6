use crate::authentication::validate_password;
use crate::domain::Role;
use crate::domain::validation::{FULL_NAME_PATTERN, USERNAME_PATTERN, not_blank};
use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered account as persisted in the `users` table.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: Secret<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub password_changed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    #[validate(
        length(min = 1, max = 30),
        regex(path = *USERNAME_PATTERN, message = "'Username' must be consisted of small letters and numbers without space.")
    )]
    pub username: String,
    #[validate(
        length(min = 1, max = 50),
        custom(function = "not_blank"),
        regex(path = *FULL_NAME_PATTERN, message = "'Full Name' must be consisted of letters and spaces only.")
    )]
    pub full_name: String,
    #[validate(length(min = 1, max = 320), email)]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(value_type = String, format = Password)]
    pub password: Secret<String>,
    /// 1 = user, 2 = admin. Defaults to 1.
    #[validate(range(min = 1, max = 2))]
    pub role: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[validate(
        length(min = 1, max = 30),
        regex(path = *USERNAME_PATTERN, message = "'Username' must be consisted of small letters and numbers without space.")
    )]
    pub username: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(value_type = String, format = Password)]
    pub password: Secret<String>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateData {
    #[validate(
        length(min = 1, max = 50),
        custom(function = "not_blank"),
        regex(path = *FULL_NAME_PATTERN, message = "'Full Name' must be consisted of letters and spaces only.")
    )]
    pub full_name: String,
    #[validate(length(min = 1, max = 320), email)]
    pub email: String,
    /// When present the password is replaced and older tokens stop working.
    #[validate(custom(function = "validate_password"))]
    #[schema(value_type = Option<String>, format = Password)]
    pub password: Option<Secret<String>>,
}

/// Public representation of a [`User`]; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    #[schema(value_type = i32, example = 1)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub password_changed_at: DateTime<Utc>,
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
            password_changed_at: user.password_changed_at,
        }
    }
}
