//! Account Error Types
//!
//! Centralized error handling for all account operations. Response bodies
//! use the field-keyed shapes the account routes answer with.

use crate::store::StoreError;
use crate::validation::FieldErrors;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Rejections produced by the token gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credential was presented at all
    #[error("No token provided")]
    NoCredential,

    /// A credential was presented but is malformed, forged or expired
    #[error("Unauthorized")]
    InvalidOrExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "msg": self.to_string() })),
        )
            .into_response()
    }
}

/// Account errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Email already exists")]
    EmailExists,

    #[error("Email not found")]
    EmailNotFound,

    #[error("Password incorrect")]
    PasswordIncorrect,

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AccountError {
    /// Shorthand for a single-field validation failure
    pub fn field(field: &str, message: &str) -> Self {
        AccountError::Validation(FieldErrors::single(field, message))
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        match self {
            AccountError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            AccountError::EmailExists => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "email": "Email already exists" })),
            )
                .into_response(),
            AccountError::EmailNotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "emailNotFound": "Email not found" })),
            )
                .into_response(),
            AccountError::PasswordIncorrect => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "passwordIncorrect": "Password incorrect" })),
            )
                .into_response(),
            AccountError::Unauthorized(auth) => auth.into_response(),
            AccountError::Store(_)
            | AccountError::Hashing(_)
            | AccountError::Signing(_)
            | AccountError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "msg": "An internal error occurred" })),
            )
                .into_response(),
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AccountError::EmailExists,
            other => {
                tracing::error!("Store error: {}", other);
                AccountError::Store(other)
            }
        }
    }
}

impl From<argon2::password_hash::Error> for AccountError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        AccountError::Hashing(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AccountError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("JWT signing error: {:?}", err);
        AccountError::Signing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AccountError::field("email", "Email is invalid"), StatusCode::BAD_REQUEST),
            (AccountError::EmailExists, StatusCode::BAD_REQUEST),
            (AccountError::EmailNotFound, StatusCode::NOT_FOUND),
            (AccountError::PasswordIncorrect, StatusCode::BAD_REQUEST),
            (AuthError::NoCredential.into(), StatusCode::UNAUTHORIZED),
            (AuthError::InvalidOrExpired.into(), StatusCode::UNAUTHORIZED),
            (
                AccountError::Store(StoreError::Database("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AccountError::Hashing("rng".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_duplicate_email_maps_to_email_exists() {
        let err: AccountError = StoreError::DuplicateEmail.into();
        assert!(matches!(err, AccountError::EmailExists));
    }
}
