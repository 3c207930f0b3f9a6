use super::CurrentUser;
use chrono::{DateTime, Duration, Utc};

/// The caller may act on a resource it owns, or on anything when admin.
pub fn is_user_authorized(current: &CurrentUser, owner_id: i32) -> bool {
    current.role.is_admin() || current.user_id == owner_id
}

/// A token is stale once the password was changed after it was issued.
///
/// `iat` only has second precision, hence the one second grace.
pub fn is_token_expired(issued_at: DateTime<Utc>, password_changed_at: DateTime<Utc>) -> bool {
    issued_at + Duration::seconds(1) < password_changed_at
}
