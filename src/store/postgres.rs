//! PostgreSQL user store

use super::{StoreError, UserStore};
use crate::models::{NewUser, User, UserFilter, UserPatch};

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// User store backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(db))
    }

    /// Run the embedded schema migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        tracing::info!("Running account database migrations");
        sqlx::migrate!("./migrations").run(&self.db).await?;
        tracing::info!("Account migrations completed successfully");
        Ok(())
    }

    fn select(filter: &UserFilter) -> QueryBuilder<'_, Postgres> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM users WHERE TRUE", USER_COLUMNS));
        if let Some(id) = filter.id {
            query.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = &filter.name {
            query.push(" AND name = ").push_bind(name);
        }
        if let Some(email) = &filter.email {
            query.push(" AND email = ").push_bind(email);
        }
        query.push(" ORDER BY created_at, id");
        query
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let mut query = Self::select(filter);
        query.push(" LIMIT 1");
        let user = query
            .build_query_as::<User>()
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let users = Self::select(filter)
            .build_query_as::<User>()
            .fetch_all(&self.db)
            .await?;
        Ok(users)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let stored = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(stored)
    }

    async fn update_by_id(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}
