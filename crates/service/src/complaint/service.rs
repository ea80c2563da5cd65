use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::complaint::{self, Complaint, ComplaintFilter, Status};

use super::errors::ComplaintError;
use super::repository::ComplaintStore;
use crate::auth::domain::Principal;
use crate::notify::{self, Notifier};

/// Raw creation input as it arrives off the wire. Field presence is part of
/// what `create` validates, so everything is optional here.
#[derive(Debug, Clone, Default)]
pub struct CreateComplaint {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

/// Owns the complaint status state machine and orchestrates
/// "write, then notify" with independent failure domains.
pub struct ComplaintService {
    store: Arc<dyn ComplaintStore>,
    notifier: Arc<dyn Notifier>,
    admin_email: String,
}

impl ComplaintService {
    pub fn new(
        store: Arc<dyn ComplaintStore>,
        notifier: Arc<dyn Notifier>,
        admin_email: String,
    ) -> Self {
        Self { store, notifier, admin_email }
    }

    /// Validate and persist a new complaint, stamping the submitter from
    /// the authenticated principal rather than client-supplied fields.
    /// Collects every violated field before rejecting. A best-effort
    /// "new complaint" notification goes to the admin address afterwards.
    #[instrument(skip(self, input, principal), fields(submitter = %principal.user.id))]
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateComplaint,
    ) -> Result<Complaint, ComplaintError> {
        let mut violations = Vec::new();

        let title = input.title.unwrap_or_default();
        if let Err(e) = complaint::validate_title(&title) {
            violations.push(e.to_string());
        }
        let description = input.description.unwrap_or_default();
        if let Err(e) = complaint::validate_description(&description) {
            violations.push(e.to_string());
        }
        let category = match input.category.as_deref() {
            None | Some("") => {
                violations.push("Please select a category".into());
                None
            }
            Some(raw) => match raw.parse() {
                Ok(c) => Some(c),
                Err(e) => {
                    violations.push(format!("{e}"));
                    None
                }
            },
        };
        let priority = match input.priority.as_deref() {
            None | Some("") => {
                violations.push("Please select a priority".into());
                None
            }
            Some(raw) => match raw.parse() {
                Ok(p) => Some(p),
                Err(e) => {
                    violations.push(format!("{e}"));
                    None
                }
            },
        };
        if !violations.is_empty() {
            return Err(ComplaintError::Validation(violations));
        }

        let record = Complaint {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category: category.unwrap(),
            priority: priority.unwrap(),
            status: Status::default(),
            submitted_at: Utc::now(),
            submitter_email: Some(principal.user.email.clone()),
            submitter_id: Some(principal.user.id),
        };
        let created = self.store.create(record).await?;
        info!(complaint_id = %created.id, category = %created.category, "complaint_created");

        notify::dispatch(
            self.notifier.clone(),
            notify::render_new_complaint(&created, &self.admin_email),
        );
        Ok(created)
    }

    /// Move a complaint to `new_status`. Setting the status it already has
    /// is an idempotent no-op that still succeeds; only a real change is
    /// written and notified, and the notification cannot undo the write.
    #[instrument(skip(self, principal), fields(requester = %principal.user.id))]
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: &str,
        principal: &Principal,
    ) -> Result<Complaint, ComplaintError> {
        let status: Status = new_status
            .parse()
            .map_err(|e| ComplaintError::Validation(vec![format!("{e}")]))?;

        let current = self.store.find_by_id(id).await?.ok_or(ComplaintError::NotFound)?;
        if current.status == status {
            return Ok(current);
        }

        let updated =
            self.store.update_status(id, status).await?.ok_or(ComplaintError::NotFound)?;
        info!(
            complaint_id = %id,
            from = %current.status,
            to = %updated.status,
            "complaint_status_updated"
        );

        notify::dispatch(
            self.notifier.clone(),
            notify::render_status_update(&updated, current.status, &self.admin_email),
        );
        Ok(updated)
    }

    /// Irreversible removal; no notification side effect.
    #[instrument(skip(self, principal), fields(requester = %principal.user.id))]
    pub async fn delete(&self, id: Uuid, principal: &Principal) -> Result<(), ComplaintError> {
        if !self.store.delete(id).await? {
            return Err(ComplaintError::NotFound);
        }
        info!(complaint_id = %id, "complaint_deleted");
        Ok(())
    }

    /// All complaints matching the filter, most recently submitted first.
    pub async fn list(
        &self,
        filter: &ComplaintFilter,
        _principal: &Principal,
    ) -> Result<Vec<Complaint>, ComplaintError> {
        let mut found = self.store.find(filter).await?;
        found.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(found)
    }

    pub async fn get(&self, id: Uuid, _principal: &Principal) -> Result<Complaint, ComplaintError> {
        self.store.find_by_id(id).await?.ok_or(ComplaintError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Claims;
    use crate::complaint::repository::memory::InMemoryComplaintStore;
    use crate::notify::recording::RecordingNotifier;
    use chrono::Duration;
    use models::complaint::{Category, Priority};
    use models::user::{Role, UserProfile};

    struct Fixture {
        svc: ComplaintService,
        store: Arc<InMemoryComplaintStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(RecordingNotifier::new()))
    }

    fn fixture_with(notifier: Arc<RecordingNotifier>) -> Fixture {
        let store = Arc::new(InMemoryComplaintStore::default());
        let svc = ComplaintService::new(
            store.clone(),
            notifier.clone(),
            "admin@company.com".to_string(),
        );
        Fixture { svc, store, notifier }
    }

    fn principal(role: Role) -> Principal {
        let now = Utc::now();
        let user = UserProfile {
            id: Uuid::new_v4(),
            name: "Tester".into(),
            email: "tester@example.com".into(),
            role,
            created_at: now,
        };
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
        };
        Principal { user, claims }
    }

    fn valid_input() -> CreateComplaint {
        CreateComplaint {
            title: Some("T".into()),
            description: Some("D".into()),
            category: Some("Support".into()),
            priority: Some("High".into()),
        }
    }

    async fn wait_for_sends(notifier: &RecordingNotifier, expected: usize) {
        for _ in 0..100 {
            if notifier.count() >= expected {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("expected {expected} notifications, saw {}", notifier.count());
    }

    /// Give any stray dispatch a chance to land before asserting a count.
    async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn create_defaults_to_pending_and_stamps_submitter() {
        let f = fixture();
        let p = principal(Role::User);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        assert_eq!(created.status, Status::Pending);
        assert_eq!(created.category, Category::Support);
        assert_eq!(created.priority, Priority::High);
        assert_eq!(created.submitter_email.as_deref(), Some("tester@example.com"));
        assert_eq!(created.submitter_id, Some(p.user.id));

        wait_for_sends(&f.notifier, 1).await;
        let sent = f.notifier.sent();
        assert_eq!(sent[0].to, "admin@company.com");
        assert!(sent[0].subject.starts_with("New Complaint Submitted"));
    }

    #[tokio::test]
    async fn create_collects_every_violation() {
        let f = fixture();
        let p = principal(Role::User);
        let err = f
            .svc
            .create(
                &p,
                CreateComplaint {
                    title: None,
                    description: Some("x".repeat(2000)),
                    category: Some("Gripes".into()),
                    priority: None,
                },
            )
            .await
            .unwrap_err();
        match err {
            ComplaintError::Validation(violations) => {
                assert_eq!(violations.len(), 4);
                assert!(violations.iter().any(|v| v.contains("title")));
                assert!(violations.iter().any(|v| v.contains("Description")));
                assert!(violations.iter().any(|v| v.contains("category")));
                assert!(violations.iter().any(|v| v.contains("priority")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        settle().await;
        assert_eq!(f.notifier.count(), 0);
    }

    #[tokio::test]
    async fn update_status_writes_and_notifies_once() {
        let f = fixture();
        let p = principal(Role::Admin);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        wait_for_sends(&f.notifier, 1).await;

        let updated = f.svc.update_status(created.id, "Resolved", &p).await.unwrap();
        assert_eq!(updated.status, Status::Resolved);
        wait_for_sends(&f.notifier, 2).await;
        let sent = f.notifier.sent();
        assert!(sent[1].body.contains("Pending -> Resolved"));

        let stored = f.store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Resolved);
    }

    #[tokio::test]
    async fn repeating_a_status_is_a_silent_no_op() {
        let f = fixture();
        let p = principal(Role::Admin);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        wait_for_sends(&f.notifier, 1).await;

        f.svc.update_status(created.id, "Resolved", &p).await.unwrap();
        wait_for_sends(&f.notifier, 2).await;

        let second = f.svc.update_status(created.id, "Resolved", &p).await.unwrap();
        assert_eq!(second.status, Status::Resolved);
        settle().await;
        assert_eq!(f.notifier.count(), 2, "no-op transition must not notify again");
    }

    #[tokio::test]
    async fn resolved_complaints_can_be_reopened() {
        let f = fixture();
        let p = principal(Role::Admin);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        f.svc.update_status(created.id, "Resolved", &p).await.unwrap();
        let reopened = f.svc.update_status(created.id, "Pending", &p).await.unwrap();
        assert_eq!(reopened.status, Status::Pending);
    }

    #[tokio::test]
    async fn unknown_status_is_a_validation_error() {
        let f = fixture();
        let p = principal(Role::Admin);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        let err = f.svc.update_status(created.id, "Escalated", &p).await.unwrap_err();
        assert!(matches!(err, ComplaintError::Validation(_)));
    }

    #[tokio::test]
    async fn update_of_missing_complaint_is_not_found() {
        let f = fixture();
        let p = principal(Role::Admin);
        let err = f.svc.update_status(Uuid::new_v4(), "Resolved", &p).await.unwrap_err();
        assert!(matches!(err, ComplaintError::NotFound));
    }

    #[tokio::test]
    async fn notifier_failure_never_fails_the_update() {
        let f = fixture_with(Arc::new(RecordingNotifier::failing()));
        let p = principal(Role::Admin);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        let updated = f.svc.update_status(created.id, "In Progress", &p).await.unwrap();
        assert_eq!(updated.status, Status::InProgress);
        let stored = f.store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::InProgress);
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let f = fixture();
        let p = principal(Role::Admin);
        let a = f.svc.create(&p, valid_input()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let b = f.svc.create(&p, valid_input()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let c = f.svc.create(&p, valid_input()).await.unwrap();
        f.svc.update_status(b.id, "Resolved", &p).await.unwrap();

        let all = f.svc.list(&ComplaintFilter::default(), &p).await.unwrap();
        assert_eq!(all.iter().map(|x| x.id).collect::<Vec<_>>(), vec![c.id, b.id, a.id]);

        let resolved = f
            .svc
            .list(&ComplaintFilter { status: Some(Status::Resolved), ..Default::default() }, &p)
            .await
            .unwrap();
        assert_eq!(resolved.iter().map(|x| x.id).collect::<Vec<_>>(), vec![b.id]);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let f = fixture();
        let p = principal(Role::Admin);
        let created = f.svc.create(&p, valid_input()).await.unwrap();
        f.svc.delete(created.id, &p).await.unwrap();
        assert!(matches!(f.svc.get(created.id, &p).await, Err(ComplaintError::NotFound)));
        assert!(matches!(f.svc.delete(created.id, &p).await, Err(ComplaintError::NotFound)));
    }
}
