use crate::domain::{Role, User};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};

/// Payload of the bearer tokens handed out on signup and login.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// Account id, as a decimal string.
    pub sub: String,
    pub name: String,
    pub role: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenIdentity {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("The token could not be verified.")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("The token carries malformed claims: {0}")]
    MalformedClaims(String),
}

/// Signs and verifies HS512 tokens with a shared secret.
#[derive(Clone)]
pub struct JwtAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: chrono::Duration,
}

impl JwtAuthority {
    pub fn new(secret: &Secret<String>, token_lifetime: chrono::Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime,
        }
    }

    #[tracing::instrument(name = "Issue token", skip(self, user), fields(user_id = user.user_id))]
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.user_id.to_string(),
            name: user.username.clone(),
            role: user.role.as_i32(),
            iat: now.timestamp(),
            exp: (now + self.token_lifetime).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        let validation = Validation::new(Algorithm::HS512);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;

        let user_id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| TokenError::MalformedClaims(format!("subject `{}`", claims.sub)))?;
        let role = Role::try_from(claims.role).map_err(TokenError::MalformedClaims)?;
        let issued_at = DateTime::<Utc>::from_timestamp(claims.iat, 0)
            .ok_or_else(|| TokenError::MalformedClaims(format!("issued at `{}`", claims.iat)))?;

        Ok(TokenIdentity {
            user_id,
            username: claims.name,
            role,
            issued_at,
        })
    }
}
