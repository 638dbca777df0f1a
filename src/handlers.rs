//! Account HTTP Handlers
//!
//! REST API endpoints for registration, login and user management. All
//! routes are POST and live under `/api/users`.

use crate::error::AccountError;
use crate::extractors::{AuthUser, JsonBody};
use crate::middleware;
use crate::models::*;
use crate::service::AccountService;

use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared account service state
pub type AccountsState = Arc<AccountService>;

// ============================================
// Route Builder
// ============================================

/// Create account routes
pub fn create_routes(accounts: AccountsState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/updateUser", post(update_user))
        .route("/getListUser", post(get_list_user))
        .route("/insertUser", post(insert_user))
        .route("/deleteUser", post(delete_user))
        .route_layer(axum_middleware::from_fn_with_state(
            accounts.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .nest("/api/users", public.merge(protected))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(accounts)
}

// ============================================
// Registration / Login
// ============================================

/// POST /api/users/register
///
/// Register a new user account
pub async fn register(
    State(accounts): State<AccountsState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AccountError> {
    let user = accounts.register(req).await?;
    Ok(Json(user))
}

/// POST /api/users/login
///
/// Authenticate user and return a JWT
pub async fn login(
    State(accounts): State<AccountsState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AccountError> {
    let response = accounts.login(req).await?;
    Ok(Json(response))
}

// ============================================
// User Management
// ============================================

/// POST /api/users/updateUser
///
/// Change a user's name and email
pub async fn update_user(
    State(accounts): State<AccountsState>,
    actor: AuthUser,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse, AccountError> {
    tracing::debug!(actor = %actor.id, target = %req.id, "Update user requested");
    let user = accounts.update_user(req).await?;

    Ok(Json(UpdateUserResponse {
        msg: "Successfully updated!".to_string(),
        user,
    }))
}

/// POST /api/users/getListUser
///
/// List users matching the filter in the body; an empty body lists everyone
pub async fn get_list_user(
    State(accounts): State<AccountsState>,
    actor: AuthUser,
    JsonBody(filter): JsonBody<UserFilter>,
) -> Result<Response, AccountError> {
    tracing::debug!(actor = %actor.id, ?filter, "List users requested");

    let users = accounts.list_users(filter).await?;
    if users.is_empty() {
        return Ok(Json(MessageResponse::new("No user found!")).into_response());
    }
    Ok(Json(users).into_response())
}

/// POST /api/users/insertUser
///
/// Create a user with the default password. An existing email is answered
/// with 200 and an `email` message, unlike `/register`.
pub async fn insert_user(
    State(accounts): State<AccountsState>,
    actor: AuthUser,
    JsonBody(req): JsonBody<UserFields>,
) -> Response {
    tracing::debug!(actor = %actor.id, email = %req.email, "Insert user requested");

    match accounts.insert_user(req).await {
        Ok(_) => Json(MessageResponse::new("Successfully added!")).into_response(),
        Err(AccountError::EmailExists) => (
            StatusCode::OK,
            Json(serde_json::json!({ "email": "Email already exists!" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/users/deleteUser
///
/// Delete a user by id
pub async fn delete_user(
    State(accounts): State<AccountsState>,
    actor: AuthUser,
    JsonBody(req): JsonBody<DeleteUserRequest>,
) -> Result<impl IntoResponse, AccountError> {
    tracing::debug!(actor = %actor.id, target = %req.id, "Delete user requested");
    accounts.delete_user(req).await?;

    Ok(Json(MessageResponse::new("Successfully deleted!")))
}
