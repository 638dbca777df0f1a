//! User Store
//!
//! The single collection this service persists to. Handlers never talk to a
//! database directly; they go through [`UserStore`], which has a PostgreSQL
//! implementation for deployments and an in-process one for tests and
//! local development.

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use crate::models::{NewUser, User, UserFilter, UserPatch};

use async_trait::async_trait;
use uuid::Uuid;

/// Store failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Another user already holds this email
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateEmail;
            }
        }
        tracing::error!("Database error: {:?}", err);
        StoreError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        tracing::error!("Migration error: {:?}", err);
        StoreError::Database(err.to_string())
    }
}

/// Document-style access to the user collection
///
/// Implementations must keep emails unique: `insert` and `update_by_id`
/// fail with [`StoreError::DuplicateEmail`] rather than create a second
/// user with the same address.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// First user matching `filter`, oldest first
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError>;

    /// All users matching `filter`, oldest first
    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;

    /// Persist a new user, assigning its id and creation time
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Apply `patch` and return the updated user, or `None` if `id` is unknown
    async fn update_by_id(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError>;

    /// Remove a user, returning it, or `None` if `id` is unknown
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}
