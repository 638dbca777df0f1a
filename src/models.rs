//! Account Models
//!
//! Data structures for account requests, responses, stored users and JWT claims.

use crate::error::AccountError;
use crate::validation::{into_result, require, require_email};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

// ============================================
// Stored Documents
// ============================================

/// User document as held by the store
///
/// Serializes with the `_id` / `date` keys API clients expect. The password
/// hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user; the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
    }
}

/// Equality filter over user fields. Empty matches every user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    #[serde(rename = "_id", default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserFilter {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.id.map_or(true, |id| user.id == id)
            && self.name.as_ref().map_or(true, |name| &user.name == name)
            && self.email.as_ref().map_or(true, |email| &user.email == email)
    }
}

// ============================================
// Request DTOs
// ============================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "Name field is required");
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password, "Password field is required");
        into_result(errors)
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password, "Password field is required");
        into_result(errors)
    }
}

/// Name and email, as accepted by `/insertUser`
#[derive(Debug, Clone, Deserialize)]
pub struct UserFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Validate for UserFields {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "Name field is required");
        require_email(&mut errors, "email", &self.email);
        into_result(errors)
    }
}

/// Update request: target id plus the new name and email
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(flatten)]
    pub fields: UserFields,
}

/// Delete request
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(rename = "_id", default)]
    pub id: String,
}

/// Parse a client-supplied `_id`
pub fn parse_user_id(raw: &str) -> Result<Uuid, AccountError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AccountError::field("_id", "Id field is required"));
    }
    Uuid::parse_str(raw).map_err(|_| AccountError::field("_id", "Id is invalid"))
}

// ============================================
// Response DTOs
// ============================================

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

/// Simple message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Result of `/updateUser`; `user` is null when no document had that id
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserResponse {
    pub msg: String,
    pub user: Option<User>,
}

// ============================================
// JWT Claims
// ============================================

/// JWT claims identifying the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: Uuid,
    /// User name at the time of login
    pub name: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let u = user("A", "a@x.com");
        let value = serde_json::to_value(&u).unwrap();

        assert_eq!(value["_id"], serde_json::json!(u.id));
        assert_eq!(value["name"], "A");
        assert_eq!(value["email"], "a@x.com");
        assert!(value.get("date").is_some());
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_filter_matching() {
        let a = user("A", "a@x.com");
        let b = user("B", "b@x.com");

        let all = UserFilter::default();
        assert!(all.matches(&a) && all.matches(&b));

        let by_email = UserFilter::by_email("a@x.com");
        assert!(by_email.matches(&a));
        assert!(!by_email.matches(&b));

        let by_id = UserFilter::by_id(b.id);
        assert!(by_id.matches(&b));
        assert!(!by_id.matches(&a));

        let both = UserFilter {
            name: Some("A".into()),
            email: Some("b@x.com".into()),
            ..UserFilter::default()
        };
        assert!(!both.matches(&a));
        assert!(!both.matches(&b));
    }

    #[test]
    fn test_filter_deserialization_ignores_unknown_keys() {
        let filter: UserFilter =
            serde_json::from_value(serde_json::json!({ "name": "A", "role": "admin" })).unwrap();
        assert_eq!(filter.name.as_deref(), Some("A"));
        assert!(filter.id.is_none());
        assert!(filter.email.is_none());
    }

    #[test]
    fn test_patch_apply() {
        let mut u = user("A", "a@x.com");
        UserPatch {
            name: Some("Alice".into()),
            email: None,
        }
        .apply(&mut u);
        assert_eq!(u.name, "Alice");
        assert_eq!(u.email, "a@x.com");
    }

    #[test]
    fn test_update_request_shape() {
        let req: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "_id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "name": "A",
            "email": "a@x.com"
        }))
        .unwrap();
        assert_eq!(req.fields.name, "A");
        assert!(parse_user_id(&req.id).is_ok());
    }

    #[test]
    fn test_parse_user_id() {
        assert!(matches!(
            parse_user_id(""),
            Err(AccountError::Validation(ref e)) if e.get("_id") == Some("Id field is required")
        ));
        assert!(matches!(
            parse_user_id("5f1d7f"),
            Err(AccountError::Validation(ref e)) if e.get("_id") == Some("Id is invalid")
        ));
    }
}
