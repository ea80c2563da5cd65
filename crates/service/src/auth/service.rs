use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{info, instrument};

use models::user::{self, User};

use super::domain::{AuthSession, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::UserStore;
use super::token::TokenService;
use crate::errors::StoreError;

/// Auth business service independent of the web framework.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Register a new user with a hashed password and mint their first
    /// token. The stored email is trimmed and lowercased.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService};
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::repository::memory::InMemoryUserStore;
    /// use models::user::Role;
    /// use std::sync::Arc;
    /// let users = Arc::new(InMemoryUserStore::default());
    /// let tokens = Arc::new(TokenService::new("doc-secret", chrono::Duration::days(7)));
    /// let svc = AuthService::new(users, tokens);
    /// let input = RegisterInput { name: "Test".into(), email: "User@Example.com".into(), password: "Secret123".into(), role: Role::User };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let email = user::normalize_email(&input.email);
        user::validate_email(&email).map_err(|e| AuthError::Validation(e.to_string()))?;
        user::validate_name(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let record = User::new(input.name.trim().to_string(), email, hash, input.role);
        let created = self.users.create(record).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::Conflict,
            other => AuthError::Store(other),
        })?;

        let token = self
            .tokens
            .issue(created.id, &created.email, created.role)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        info!(user_id = %created.id, email = %created.email, role = %created.role, "user_registered");
        Ok(AuthSession { user: created.profile(), token })
    }

    /// Authenticate a user and issue a fresh token. Unknown email and wrong
    /// password are deliberately the same error.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use service::auth::repository::memory::InMemoryUserStore;
    /// use models::user::Role;
    /// use std::sync::Arc;
    /// let users = Arc::new(InMemoryUserStore::default());
    /// let tokens = Arc::new(TokenService::new("doc-secret", chrono::Duration::days(7)));
    /// let svc = AuthService::new(users, tokens);
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into(), role: Role::User }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = user::normalize_email(&input.email);
        let found =
            self.users.find_by_email(&email).await?.ok_or(AuthError::InvalidCredentials)?;

        let parsed =
            PasswordHash::new(&found.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(found.id, &found.email, found.role)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        info!(user_id = %found.id, "user_logged_in");
        Ok(AuthSession { user: found.profile(), token })
    }
}
