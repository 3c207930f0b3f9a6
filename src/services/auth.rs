use super::ServiceError;
use crate::authentication::{AuthError, JwtAuthority, hash_password, verify_password};
use crate::domain::{LoginData, Role, SignupData, validate_dto};
use crate::repository::{NewUser, UserRepository};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtAuthority,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtAuthority) -> Self {
        Self { users, jwt }
    }

    /// Registers a new account and returns a bearer token for it.
    #[tracing::instrument(name = "Sign up", skip(self, data), fields(username = %data.username))]
    pub async fn signup(&self, data: SignupData) -> Result<String, ServiceError> {
        validate_dto(&data)?;

        if self.users.get_user_by_username(&data.username).await?.is_some() {
            return Err(ServiceError::Conflict("The username is already taken.".into()));
        }
        if self.users.get_user_by_email(&data.email).await?.is_some() {
            return Err(ServiceError::Conflict("The email is already taken.".into()));
        }

        let role = match data.role {
            Some(code) => Role::try_from(code).map_err(ServiceError::BadRequest)?,
            None => Role::default(),
        };
        let password_hash = hash_password(data.password).await?;

        let user = self
            .users
            .create_user(NewUser {
                username: data.username,
                full_name: data.full_name,
                email: data.email,
                password_hash,
                role,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(user_id = user.user_id, "Account created");

        let token = self
            .jwt
            .issue(&user)
            .context("Failed to issue a token for the new account.")?;
        Ok(token)
    }

    #[tracing::instrument(name = "Log in", skip(self, data), fields(username = %data.username))]
    pub async fn login(&self, data: LoginData) -> Result<String, ServiceError> {
        validate_dto(&data)?;

        let user = self
            .users
            .get_user_by_username(&data.username)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;

        verify_password(user.password_hash.clone(), data.password)
            .await
            .map_err(|e| match e {
                AuthError::InvalidCredentials(_) => {
                    ServiceError::Unauthorized("Username or password is incorrect.".into())
                }
                AuthError::UnexpectedError(e) => ServiceError::UnexpectedError(e),
            })?;

        let token = self
            .jwt
            .issue(&user)
            .context("Failed to issue a token.")?;
        Ok(token)
    }
}
