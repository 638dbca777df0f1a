//! Authentication and Body Extractors

use crate::error::{AccountError, AuthError};
use crate::models::Claims;
use crate::validation::FieldErrors;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Authenticated user information extracted from JWT claims
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

impl AuthUser {
    /// Create user from JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self { id: claims.id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are placed here by the `require_auth` middleware
        parts
            .extensions
            .get::<Claims>()
            .map(AuthUser::from_claims)
            .ok_or(AuthError::NoCredential)
    }
}

/// JSON request body whose failures answer with a field-keyed 400
///
/// The `Content-Type` header is not consulted. An empty body reads as `{}`,
/// so missing input surfaces as the usual "field is required" messages.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AccountError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            AccountError::field("body", "Body could not be read")
        })?;

        parse_body(&bytes).map(JsonBody)
    }
}

/// Decode a request body into `T`
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AccountError> {
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(bytes)
            .map_err(|_| AccountError::field("body", "Body is not valid JSON"))?
    };

    let Value::Object(fields) = value else {
        return Err(AccountError::field("body", "Body must be a JSON object"));
    };

    serde_json::from_value(Value::Object(fields.clone())).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        AccountError::Validation(invalid_fields::<T>(&fields))
    })
}

/// Every DTO field defaults, so a key tried on its own fails only when its
/// own value has the wrong shape.
fn invalid_fields<T: DeserializeOwned>(fields: &Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for (key, value) in fields {
        let mut single = Map::new();
        single.insert(key.clone(), value.clone());
        if serde_json::from_value::<T>(Value::Object(single)).is_err() {
            errors.insert(key, &format!("{} is invalid", field_label(key)));
        }
    }

    if errors.is_empty() {
        errors.insert("body", "Body is invalid");
    }
    errors
}

fn field_label(key: &str) -> String {
    let mut chars = key.trim_start_matches('_').chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Field".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegisterRequest, UpdateUserRequest, UserFilter};

    fn field_errors<T: std::fmt::Debug>(result: Result<T, AccountError>) -> FieldErrors {
        match result {
            Err(AccountError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        let req: RegisterRequest = parse_body(b"").unwrap();
        assert!(req.name.is_empty() && req.email.is_empty() && req.password.is_empty());

        let filter: UserFilter = parse_body(b"  \n").unwrap();
        assert!(filter.id.is_none() && filter.name.is_none() && filter.email.is_none());
    }

    #[test]
    fn test_wrong_shaped_fields_are_named() {
        let errors = field_errors(parse_body::<UserFilter>(br#"{"_id":"nope"}"#));
        assert_eq!(errors.get("_id"), Some("Id is invalid"));

        let errors = field_errors(parse_body::<UserFilter>(br#"{"email":123,"name":["x"]}"#));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("name"), Some("Name is invalid"));
    }

    #[test]
    fn test_flattened_fields_are_named() {
        let errors = field_errors(parse_body::<UpdateUserRequest>(
            br#"{"_id":"6f9619ff-8b86-d011-b42d-00cf4fc964ff","name":5}"#,
        ));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Name is invalid"));
    }

    #[test]
    fn test_unusable_bodies() {
        let errors = field_errors(parse_body::<RegisterRequest>(b"{not json"));
        assert_eq!(errors.get("body"), Some("Body is not valid JSON"));

        let errors = field_errors(parse_body::<RegisterRequest>(b"[1, 2]"));
        assert_eq!(errors.get("body"), Some("Body must be a JSON object"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let filter: UserFilter = parse_body(br#"{"name":"A","role":"admin"}"#).unwrap();
        assert_eq!(filter.name.as_deref(), Some("A"));
    }
}
