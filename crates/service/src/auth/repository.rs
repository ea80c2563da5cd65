use async_trait::async_trait;
use uuid::Uuid;

use models::user::User;

use crate::errors::StoreError;

/// Credential store collaborator. Emails are stored normalized; uniqueness
/// is enforced here, surfacing as a tagged `Conflict`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn create(&self, user: User) -> Result<User, StoreError>;
}

/// Simple in-memory store for tests and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: Mutex<HashMap<Uuid, User>>,
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&id).cloned())
        }

        async fn create(&self, user: User) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == user.email) {
                return Err(StoreError::Conflict(format!("email taken: {}", user.email)));
            }
            users.insert(user.id, user.clone());
            Ok(user)
        }
    }
}
