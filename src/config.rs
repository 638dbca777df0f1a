//! Account Service Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or sensitive data.

use crate::error::AccountError;
use std::env;

/// Default token lifetime: one year in seconds
pub const DEFAULT_TOKEN_EXPIRATION: i64 = 31_556_926;

/// Longest accepted token lifetime: one hundred years in seconds
pub const MAX_TOKEN_EXPIRATION: i64 = 100 * DEFAULT_TOKEN_EXPIRATION;

/// Tokens living longer than this get a startup warning
pub const LONG_LIVED_TOKEN_THRESHOLD: i64 = 30 * 24 * 60 * 60;

/// Account service configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// JWT expiration in seconds (from JWT_EXPIRATION env var)
    pub token_expiration: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,

    /// Password given to accounts created through `/insertUser`
    /// (from DEFAULT_USER_PASSWORD env var)
    pub default_user_password: String,

    /// PostgreSQL connection string (from DATABASE_URL env var)
    pub database_url: Option<String>,

    /// Pool size (from DATABASE_MAX_CONNECTIONS env var)
    pub database_max_connections: u32,

    /// HTTP listen port (from PORT env var)
    pub port: u16,
}

impl AccountsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AccountError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AccountError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").ok_or_else(|| {
            AccountError::Config("JWT_SECRET environment variable must be set".to_string())
        })?;

        Ok(Self {
            jwt_secret,

            token_expiration: lookup("JWT_EXPIRATION")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRATION),

            argon2_memory_cost: lookup("ARGON2_MEMORY_COST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: lookup("ARGON2_TIME_COST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: lookup("ARGON2_PARALLELISM")
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),

            default_user_password: lookup("DEFAULT_USER_PASSWORD")
                .unwrap_or_else(|| "123456".to_string()),

            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5002),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AccountError> {
        if self.jwt_secret.len() < 32 {
            return Err(AccountError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.token_expiration <= 0 {
            return Err(AccountError::Config(
                "JWT_EXPIRATION must be positive".to_string(),
            ));
        }

        if self.token_expiration > MAX_TOKEN_EXPIRATION {
            return Err(AccountError::Config(format!(
                "JWT_EXPIRATION must be at most {} seconds",
                MAX_TOKEN_EXPIRATION
            )));
        }

        if self.default_user_password.is_empty() {
            return Err(AccountError::Config(
                "DEFAULT_USER_PASSWORD must not be empty".to_string(),
            ));
        }

        if self.database_max_connections == 0 {
            return Err(AccountError::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether issued tokens outlive what a bearer token normally should
    pub fn has_long_lived_tokens(&self) -> bool {
        self.token_expiration > LONG_LIVED_TOKEN_THRESHOLD
    }
}
