use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;

use common::types::Envelope;
use models::user::Role;
use service::auth::domain::{AuthSession, LoginInput, RegisterInput};
use service::auth::repository::UserStore;
use service::auth::{AuthService, TokenService};
use service::complaint::ComplaintService;

use crate::errors::ApiError;
use crate::guard::{Authenticated, AUTH_COOKIE};

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub complaints: Arc<ComplaintService>,
}

/// Field presence is validated by the handler, so everything arrives
/// optional off the wire.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn session_cookie(token: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthSession>>), ApiError> {
    let (Some(name), Some(email), Some(password)) = (input.name, input.email, input.password)
    else {
        return Err(ApiError::Validation(vec![
            "Please provide name, email, and password".into(),
        ]));
    };
    // Registration may carry a role; it defaults to `user`.
    let role = match input.role.as_deref() {
        None | Some("") => Role::User,
        Some(raw) => raw.parse().map_err(|e| ApiError::Validation(vec![format!("{e}")]))?,
    };

    let session = state.auth.register(RegisterInput { name, email, password, role }).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(session, "User registered successfully")),
    ))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Envelope<AuthSession>>), ApiError> {
    let (Some(email), Some(password)) = (input.email, input.password) else {
        return Err(ApiError::Validation(vec!["Please provide email and password".into()]));
    };

    let session = state.auth.login(LoginInput { email, password }).await?;
    let jar = jar.add(session_cookie(&session.token));
    Ok((jar, Json(Envelope::ok_with_message(session, "Login successful"))))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 200, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Envelope<()>>) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, Json(Envelope::ok_message("Logged out")))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "OK"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    Authenticated(principal): Authenticated,
) -> Json<Envelope<serde_json::Value>> {
    Json(Envelope::ok(json!({ "user": principal.user })))
}
