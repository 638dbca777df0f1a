//! Authentication Middleware
//!
//! The one gate every protected route sits behind.

use crate::error::AuthError;
use crate::handlers::AccountsState;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Require a valid bearer token
///
/// Validates the JWT from the Authorization header and stores the claims in
/// request extensions for the [`AuthUser`](crate::extractors::AuthUser)
/// extractor. The handler never runs for a rejected request.
pub async fn require_auth(
    State(accounts): State<AccountsState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidOrExpired)?),
        None => None,
    };

    let claims = accounts.tokens().authenticate(auth_header).map_err(|e| {
        tracing::debug!(uri = %req.uri(), "Request rejected: {}", e);
        e
    })?;

    // Store claims in request extensions for extractors
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
