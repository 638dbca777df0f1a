//! RustPress Accounts
//!
//! User account service for RustPress providing:
//! - User registration with Argon2id password hashing
//! - Login with JWT issuance
//! - Bearer-token gated user management (list, update, insert, delete)
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing JWTs (required, min 32 chars)
//! - `JWT_EXPIRATION` - Token expiration in seconds (default: 31556926, one year)
//! - `ARGON2_MEMORY_COST` / `ARGON2_TIME_COST` / `ARGON2_PARALLELISM` - hashing costs
//! - `DEFAULT_USER_PASSWORD` - Password for users created via `/insertUser` (default: "123456")
//! - `DATABASE_URL` - PostgreSQL connection string (optional, in-memory store when unset)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `PORT` - HTTP port (default: 5002)
//!
//! # Usage
//!
//! ```rust,ignore
//! use rustpress_accounts::{create_routes, open_store, AccountService, AccountsConfig};
//! use std::sync::Arc;
//!
//! let config = AccountsConfig::from_env()?;
//! config.validate()?;
//!
//! let store = open_store(&config).await?;
//! let accounts = Arc::new(AccountService::new(store, config)?);
//! let app = create_routes(accounts);
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod service;
pub mod store;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use config::AccountsConfig;
pub use credentials::CredentialManager;
pub use error::{AccountError, AuthError};
pub use extractors::{AuthUser, JsonBody};
pub use handlers::{create_routes, AccountsState};
pub use models::*;
pub use service::AccountService;
pub use store::{MemoryUserStore, PgUserStore, StoreError, UserStore};
pub use token::TokenGate;

use std::sync::Arc;

/// Open the user store selected by `config`
///
/// Connects to PostgreSQL and runs migrations when `DATABASE_URL` is set,
/// otherwise falls back to an in-memory store.
pub async fn open_store(config: &AccountsConfig) -> Result<Arc<dyn UserStore>, AccountError> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to PostgreSQL");
            let store = PgUserStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_store_without_database_url() {
        let config = AccountsConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("a".repeat(32)),
            _ => None,
        })
        .unwrap();

        let store = open_store(&config).await.unwrap();
        let users = store.find(&UserFilter::default()).await.unwrap();
        assert!(users.is_empty());
    }
}
