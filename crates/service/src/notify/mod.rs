//! Notification rendering and fire-and-forget dispatch.
//!
//! Actual mail delivery is an external collaborator behind the [`Notifier`]
//! trait; the in-tree default only logs. Dispatch outcomes are observed for
//! logging and never joined into the triggering operation's result.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use models::complaint::{Complaint, Status};

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Default notifier: logs the hand-off to the mail relay, or the skip when
/// no transport is configured.
pub struct LogNotifier {
    delivery_configured: bool,
}

impl LogNotifier {
    pub fn new(delivery_configured: bool) -> Self {
        Self { delivery_configured }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !self.delivery_configured {
            debug!(
                to = %notification.to,
                subject = %notification.subject,
                "mail transport not configured; skipping notification"
            );
            return Ok(());
        }
        info!(
            to = %notification.to,
            subject = %notification.subject,
            "notification handed to mail relay"
        );
        Ok(())
    }
}

/// Recording notifier for tests and doc examples
pub mod recording {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// A notifier whose every send fails, for failure-isolation tests.
        pub fn failing() -> Self {
            Self { sent: Mutex::new(Vec::new()), fail: true }
        }

        /// Number of send attempts observed so far.
        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                return Err(NotifyError::Transport("recording notifier set to fail".into()));
            }
            Ok(())
        }
    }
}

pub fn render_new_complaint(complaint: &Complaint, admin_email: &str) -> Notification {
    let mut body = format!(
        "A new complaint was received.\n\n\
         Title: {}\n\
         Category: {}\n\
         Priority: {}\n\
         Submitted: {}\n\n\
         Description:\n{}\n",
        complaint.title,
        complaint.category,
        complaint.priority,
        complaint.submitted_at.format("%Y-%m-%d %H:%M UTC"),
        complaint.description,
    );
    if let Some(email) = &complaint.submitter_email {
        body.push_str(&format!("\nUser email: {email}\n"));
    }
    body.push_str("\nPlease log in to the admin dashboard to manage this complaint.\n");
    Notification {
        to: admin_email.to_string(),
        subject: format!("New Complaint Submitted: {}", complaint.title),
        body,
    }
}

pub fn render_status_update(
    complaint: &Complaint,
    old_status: Status,
    admin_email: &str,
) -> Notification {
    let body = format!(
        "Complaint status changed: {} -> {}\n\n\
         Title: {}\n\
         Category: {}\n\
         Priority: {}\n",
        old_status, complaint.status, complaint.title, complaint.category, complaint.priority,
    );
    Notification {
        to: admin_email.to_string(),
        subject: format!("Complaint Status Updated: {}", complaint.title),
        body,
    }
}

/// Fire-and-forget dispatch on the runtime. The send runs uncoupled from
/// the caller; failure is logged at warn and goes nowhere else.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            warn!(
                error = %e,
                to = %notification.to,
                subject = %notification.subject,
                "notification dispatch failed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::complaint::{Category, Priority};
    use uuid::Uuid;

    fn complaint() -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            title: "Broken widget".into(),
            description: "It snapped in half.".into(),
            category: Category::Product,
            priority: Priority::High,
            status: Status::Pending,
            submitted_at: Utc::now(),
            submitter_email: Some("u@x.com".into()),
            submitter_id: None,
        }
    }

    #[test]
    fn new_complaint_notification_carries_the_details() {
        let n = render_new_complaint(&complaint(), "admin@company.com");
        assert_eq!(n.to, "admin@company.com");
        assert_eq!(n.subject, "New Complaint Submitted: Broken widget");
        assert!(n.body.contains("Category: Product"));
        assert!(n.body.contains("Priority: High"));
        assert!(n.body.contains("It snapped in half."));
        assert!(n.body.contains("User email: u@x.com"));
    }

    #[test]
    fn status_update_notification_names_both_states() {
        let mut c = complaint();
        c.status = Status::Resolved;
        let n = render_status_update(&c, Status::Pending, "admin@company.com");
        assert_eq!(n.subject, "Complaint Status Updated: Broken widget");
        assert!(n.body.contains("Pending -> Resolved"));
    }

    #[tokio::test]
    async fn dispatch_swallows_transport_failures() {
        let notifier = Arc::new(recording::RecordingNotifier::failing());
        dispatch(notifier.clone(), render_new_complaint(&complaint(), "admin@company.com"));
        for _ in 0..50 {
            if notifier.count() == 1 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("dispatch never reached the notifier");
    }
}
