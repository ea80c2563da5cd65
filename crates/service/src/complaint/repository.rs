use async_trait::async_trait;
use uuid::Uuid;

use models::complaint::{Complaint, ComplaintFilter, Status};

use crate::errors::StoreError;

/// Complaint store collaborator: a generic document store reached through
/// create/find/update/delete. Result ordering belongs to the service, not
/// the store.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn create(&self, complaint: Complaint) -> Result<Complaint, StoreError>;
    async fn find(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, StoreError>;
    async fn update_status(&self, id: Uuid, status: Status)
        -> Result<Option<Complaint>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Simple in-memory store for tests and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryComplaintStore {
        complaints: Mutex<HashMap<Uuid, Complaint>>,
    }

    #[async_trait]
    impl ComplaintStore for InMemoryComplaintStore {
        async fn create(&self, complaint: Complaint) -> Result<Complaint, StoreError> {
            let mut complaints = self.complaints.lock().unwrap();
            complaints.insert(complaint.id, complaint.clone());
            Ok(complaint)
        }

        async fn find(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, StoreError> {
            let complaints = self.complaints.lock().unwrap();
            Ok(complaints.values().filter(|c| filter.matches(c)).cloned().collect())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, StoreError> {
            let complaints = self.complaints.lock().unwrap();
            Ok(complaints.get(&id).cloned())
        }

        async fn update_status(
            &self,
            id: Uuid,
            status: Status,
        ) -> Result<Option<Complaint>, StoreError> {
            let mut complaints = self.complaints.lock().unwrap();
            Ok(complaints.get_mut(&id).map(|c| {
                c.status = status;
                c.clone()
            }))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
            let mut complaints = self.complaints.lock().unwrap();
            Ok(complaints.remove(&id).is_some())
        }
    }
}
