use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use models::complaint::{Complaint, ComplaintFilter, Status};
use models::user::User;

use crate::auth::repository::UserStore;
use crate::complaint::repository::ComplaintStore;
use crate::errors::StoreError;

async fn load_map<V>(file_path: &PathBuf) -> Result<HashMap<Uuid, V>, StoreError>
where
    V: serde::de::DeserializeOwned + serde::Serialize,
{
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).await.ok();
    }
    match fs::read(file_path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes).unwrap_or_default()),
        Err(_) => {
            let empty: HashMap<Uuid, V> = HashMap::new();
            let bytes = serde_json::to_vec(&empty)
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            fs::write(file_path, bytes)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(empty)
        }
    }
}

async fn save_map<V>(file_path: &PathBuf, map: &HashMap<Uuid, V>) -> Result<(), StoreError>
where
    V: serde::Serialize,
{
    let data = serde_json::to_vec(map).map_err(|e| StoreError::Unavailable(e.to_string()))?;
    fs::write(file_path, data).await.map_err(|e| StoreError::Unavailable(e.to_string()))?;
    Ok(())
}

/// User records persisted to a single JSON file, keyed by id.
#[derive(Clone)]
pub struct JsonUserStore {
    inner: Arc<RwLock<HashMap<Uuid, User>>>,
    file_path: PathBuf,
}

impl JsonUserStore {
    /// Open the store, creating the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let file_path = path.into();
        let map = load_map(&file_path).await?;
        Ok(Self { inner: Arc::new(RwLock::new(map)), file_path })
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.inner.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.inner.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.inner.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email taken: {}", user.email)));
        }
        users.insert(user.id, user.clone());
        save_map(&self.file_path, &users).await?;
        Ok(user)
    }
}

/// Complaint records persisted to a single JSON file, keyed by id.
#[derive(Clone)]
pub struct JsonComplaintStore {
    inner: Arc<RwLock<HashMap<Uuid, Complaint>>>,
    file_path: PathBuf,
}

impl JsonComplaintStore {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let file_path = path.into();
        let map = load_map(&file_path).await?;
        Ok(Self { inner: Arc::new(RwLock::new(map)), file_path })
    }
}

#[async_trait]
impl ComplaintStore for JsonComplaintStore {
    async fn create(&self, complaint: Complaint) -> Result<Complaint, StoreError> {
        let mut complaints = self.inner.write().await;
        complaints.insert(complaint.id, complaint.clone());
        save_map(&self.file_path, &complaints).await?;
        Ok(complaint)
    }

    async fn find(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, StoreError> {
        let complaints = self.inner.read().await;
        Ok(complaints.values().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, StoreError> {
        let complaints = self.inner.read().await;
        Ok(complaints.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: Status,
    ) -> Result<Option<Complaint>, StoreError> {
        let mut complaints = self.inner.write().await;
        let updated = match complaints.get_mut(&id) {
            Some(c) => {
                c.status = status;
                c.clone()
            }
            None => return Ok(None),
        };
        save_map(&self.file_path, &complaints).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut complaints = self.inner.write().await;
        if complaints.remove(&id).is_none() {
            return Ok(false);
        }
        save_map(&self.file_path, &complaints).await?;
        Ok(true)
    }
}
