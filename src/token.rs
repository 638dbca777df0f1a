//! Token Gate
//!
//! Issues and verifies the HS256 bearer tokens handed out at login. Tokens
//! are not stored anywhere: a token is valid exactly when its signature
//! checks out and its `exp` lies in the future.

use crate::config::AccountsConfig;
use crate::error::{AccountError, AuthError};
use crate::models::{Claims, User};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// Signs and checks access tokens with a shared secret
pub struct TokenGate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenGate {
    /// Create a gate for `secret` issuing tokens valid for `ttl_seconds`
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn from_config(config: &AccountsConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_expiration)
    }

    /// Issue a token for `user`, valid from now
    pub fn issue(&self, user: &User) -> Result<String, AccountError> {
        self.issue_at(user.id, &user.name, Utc::now())
    }

    /// Issue a token as if the clock read `issued_at`
    pub fn issue_at(
        &self,
        id: Uuid,
        name: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AccountError> {
        let expires_at = Duration::try_seconds(self.ttl_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                AccountError::Signing(format!(
                    "token lifetime of {}s is out of range",
                    self.ttl_seconds
                ))
            })?;

        let claims = Claims {
            id,
            name: name.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {:?}", e);
                AuthError::InvalidOrExpired
            })
    }

    /// Authenticate the raw value of an `Authorization` header
    ///
    /// A missing header is `NoCredential`; anything present that is not a
    /// valid `Bearer` token is `InvalidOrExpired`.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let header = authorization.ok_or(AuthError::NoCredential)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::InvalidOrExpired)?;

        self.verify(token)
    }
}
