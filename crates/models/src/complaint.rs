use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ModelError;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Product,
    Service,
    Support,
    Billing,
    Technical,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Product => "Product",
            Category::Service => "Service",
            Category::Support => "Support",
            Category::Billing => "Billing",
            Category::Technical => "Technical",
            Category::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let all = [
            Category::Product,
            Category::Service,
            Category::Support,
            Category::Billing,
            Category::Technical,
            Category::Other,
        ];
        all.into_iter()
            .find(|c| s.eq_ignore_ascii_case(&c.to_string()))
            .ok_or_else(|| ModelError::Validation(format!("unknown category: {s}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let all = [Priority::Low, Priority::Medium, Priority::High];
        all.into_iter()
            .find(|p| s.eq_ignore_ascii_case(&p.to_string()))
            .ok_or_else(|| ModelError::Validation(format!("unknown priority: {s}")))
    }
}

/// Workflow status. Every state is reachable from every other, including
/// self-transitions; complaints can be reopened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        };
        f.write_str(s)
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let all = [Status::Pending, Status::InProgress, Status::Resolved];
        all.into_iter()
            .find(|st| s.eq_ignore_ascii_case(&st.to_string()))
            .ok_or_else(|| ModelError::Validation(format!("unknown status: {s}")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub submitted_at: DateTime<Utc>,
    pub submitter_email: Option<String>,
    pub submitter_id: Option<Uuid>,
}

/// Exact-match narrowing for listings. `None` on a field means no filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComplaintFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}

impl ComplaintFilter {
    pub fn matches(&self, c: &Complaint) -> bool {
        self.status.map_or(true, |s| c.status == s)
            && self.priority.map_or(true, |p| c.priority == p)
            && self.category.map_or(true, |cat| c.category == cat)
    }
}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    if title.trim().is_empty() {
        return Err(ModelError::Validation("Please provide a complaint title".into()));
    }
    if title.trim().chars().count() > TITLE_MAX_LEN {
        return Err(ModelError::Validation(format!(
            "Title cannot be more than {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ModelError> {
    if description.trim().is_empty() {
        return Err(ModelError::Validation("Please provide a complaint description".into()));
    }
    if description.trim().chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ModelError::Validation(format!(
            "Description cannot be more than {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}
