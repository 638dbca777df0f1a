//! Account Service
//!
//! Registration, login and user management over a [`UserStore`], using the
//! [`CredentialManager`] for passwords and the [`TokenGate`] for tokens.

use crate::config::AccountsConfig;
use crate::credentials::CredentialManager;
use crate::error::AccountError;
use crate::models::*;
use crate::store::UserStore;
use crate::token::TokenGate;
use crate::validation::validate_input;

use std::sync::Arc;

/// Account service
pub struct AccountService {
    store: Arc<dyn UserStore>,
    config: AccountsConfig,
    credentials: CredentialManager,
    tokens: TokenGate,
}

impl AccountService {
    /// Create a new account service
    pub fn new(store: Arc<dyn UserStore>, config: AccountsConfig) -> Result<Self, AccountError> {
        let credentials = CredentialManager::from_config(&config)?;
        let tokens = TokenGate::from_config(&config);

        Ok(Self {
            store,
            config,
            credentials,
            tokens,
        })
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    pub fn tokens(&self) -> &TokenGate {
        &self.tokens
    }

    // ============================================
    // Registration / Login
    // ============================================

    /// Register a new user
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AccountError> {
        validate_input(&req)?;
        self.ensure_email_free(&req.email).await?;

        let password_hash = self.credentials.hash(&req.password).await?;
        let user = self
            .store
            .insert(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AccountError> {
        validate_input(&req)?;

        let user = self
            .store
            .find_one(&UserFilter::by_email(&req.email))
            .await?
            .ok_or_else(|| {
                tracing::debug!(email = %req.email, "Login for unknown email");
                AccountError::EmailNotFound
            })?;

        if !self
            .credentials
            .verify(&req.password, &user.password_hash)
            .await
        {
            tracing::info!(user_id = %user.id, "Login failed: password incorrect");
            return Err(AccountError::PasswordIncorrect);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            success: true,
            token,
        })
    }

    // ============================================
    // User Management
    // ============================================

    /// Change a user's name and email; `None` if no user has that id
    pub async fn update_user(&self, req: UpdateUserRequest) -> Result<Option<User>, AccountError> {
        validate_input(&req.fields)?;
        let id = parse_user_id(&req.id)?;

        let patch = UserPatch {
            name: Some(req.fields.name),
            email: Some(req.fields.email),
        };
        let user = self.store.update_by_id(id, patch).await?;

        match &user {
            Some(user) => tracing::info!(user_id = %user.id, "User updated"),
            None => tracing::debug!(user_id = %id, "Update for unknown user"),
        }
        Ok(user)
    }

    /// Users matching `filter`
    pub async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, AccountError> {
        Ok(self.store.find(&filter).await?)
    }

    /// Create a user on someone else's behalf, with the default password
    pub async fn insert_user(&self, req: UserFields) -> Result<User, AccountError> {
        validate_input(&req)?;
        self.ensure_email_free(&req.email).await?;

        let password_hash = self
            .credentials
            .hash(&self.config.default_user_password)
            .await?;
        let user = self
            .store
            .insert(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
            })
            .await?;

        tracing::warn!(
            user_id = %user.id,
            email = %user.email,
            "User created with the default password"
        );
        Ok(user)
    }

    /// Delete a user; deleting an unknown id is not an error
    pub async fn delete_user(&self, req: DeleteUserRequest) -> Result<(), AccountError> {
        let id = parse_user_id(&req.id)?;

        match self.store.delete_by_id(id).await? {
            Some(user) => tracing::info!(user_id = %user.id, "User deleted"),
            None => tracing::debug!(user_id = %id, "Delete for unknown user"),
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), AccountError> {
        if self
            .store
            .find_one(&UserFilter::by_email(email))
            .await?
            .is_some()
        {
            return Err(AccountError::EmailExists);
        }
        Ok(())
    }
}
