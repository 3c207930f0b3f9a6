//! Business rules between the HTTP layer and the repositories.

mod auth;
mod blog;
mod error;
mod user;

pub use auth::AuthService;
pub use blog::BlogService;
pub use error::ServiceError;
pub use user::UserService;

use crate::authentication::{CurrentUser, is_token_expired};
use crate::repository::UserRepository;

/// Rejects tokens issued before the caller's last password change, and
/// tokens whose account no longer exists.
#[tracing::instrument(name = "Check token is current", skip(users, current), fields(user_id = current.user_id))]
async fn ensure_token_is_current(
    users: &dyn UserRepository,
    current: &CurrentUser,
) -> Result<(), ServiceError> {
    // The caller's own account, not the target's: an admin token stays valid
    // when the edited user changes their password.
    let account = users
        .get_user_by_id(current.user_id)
        .await?
        .ok_or_else(ServiceError::token_expired)?;
    if is_token_expired(current.issued_at, account.password_changed_at) {
        return Err(ServiceError::token_expired());
    }
    Ok(())
}
