//! Access guard: resolves the caller's identity from a bearer token and
//! gates operations on an allow-list of roles. Every protected handler
//! authenticates via the [`Authenticated`] extractor before any
//! [`require_role`] check runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use models::user::Role;
use service::auth::domain::Principal;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Read the bearer token from the Authorization header, falling back to
/// the `auth_token` cookie.
fn bearer_token(parts: &Parts) -> Option<String> {
    if let Some(h) = parts.headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let prefix = "Bearer ";
        if let Some(token) = h.strip_prefix(prefix) {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
        return None;
    }

    let cookie_header =
        parts.headers.get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or("");
    for part in cookie_header.split(';') {
        if let Some(rest) = part.trim().strip_prefix("auth_token=") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

/// Extractor producing the authenticated principal. Verifies the token,
/// then re-resolves the user from the credential store by the claimed
/// subject id so a deleted account cannot keep using an old token.
pub struct Authenticated(pub Principal);

#[async_trait]
impl FromRequestParts<ServerState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or(ApiError::Unauthenticated("No token provided"))?;
        let claims = state
            .tokens
            .verify(&token)
            .map_err(|_| ApiError::Unauthenticated("Invalid token"))?;
        let user = state
            .users
            .find_by_id(claims.sub)
            .await
            .map_err(|e| ApiError::Internal(format!("credential store unavailable: {e}")))?
            .ok_or(ApiError::Unauthenticated("User not found"))?;
        Ok(Authenticated(Principal { user: user.profile(), claims }))
    }
}

/// Pure set-membership check against the verified claims' role; never
/// re-queries the store.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&principal.role()) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
