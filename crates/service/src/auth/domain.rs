use serde::{Deserialize, Serialize};

use models::user::{Role, UserProfile};

use super::token::Claims;

/// Registration input
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Login input
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

/// An authenticated caller: the store-resolved user plus the verified
/// claims the bearer token carried. Passed explicitly into every protected
/// operation; there is no ambient session state.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: UserProfile,
    pub claims: Claims,
}

impl Principal {
    /// Authorization checks run against the role embedded in the verified
    /// claims, not a fresh store read.
    pub fn role(&self) -> Role {
        self.claims.role
    }
}
