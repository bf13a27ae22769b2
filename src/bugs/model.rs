//! Bug report records.
//!
//! Field names and enum strings serialize exactly as the original snapshots
//! stored them (camelCase keys, kebab-case status), so an existing scratch
//! document loads unchanged. Timestamps are unix milliseconds.

use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

use crate::auth::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    InProgress,
    Closed,
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Assigned to every account on sign-up.
    #[default]
    Developer,
    Tester,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: i64,
}

impl From<&Session> for User {
    /// Every provider session projects into an application user carrying the
    /// role assigned on sign-up.
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            email: session.email.clone(),
            role: Role::default(),
            created_at: session.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub bug_id: Uuid,
    pub text: String,
    pub author: String,
    pub created_at: i64,
}

/// One line of a bug's audit trail. Entry ids are ULIDs, so the trail sorts
/// by creation without touching timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Ulid,
    pub bug_id: Uuid,
    pub action: String,
    pub details: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: Status,
    pub assigned_to: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    pub is_resolved: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub activity_logs: Vec<ActivityEntry>,
    /// Screenshot attachments as data URLs, exactly as uploaded.
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub created_by: String,
}

/// Input for creating a report; ids, timestamps, comments, and the activity
/// trail are the repository's job.
#[derive(Clone, Debug)]
pub struct BugDraft {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: Status,
    pub assigned_to: String,
    pub screenshots: Vec<String>,
    pub deadline: Option<i64>,
    pub created_by: String,
}

impl BugDraft {
    /// A draft with the form's defaults: low severity, open status.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Low,
            status: Status::Open,
            assigned_to: String::new(),
            screenshots: Vec::new(),
            deadline: None,
            created_by: String::new(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_assigned_to(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = assignee.into();
        self
    }

    #[must_use]
    pub fn with_created_by(mut self, reporter: impl Into<String>) -> Self {
        self.created_by = reporter.into();
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_screenshots(mut self, screenshots: Vec<String>) -> Self {
        self.screenshots = screenshots;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_with_kebab_case() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::from_str::<Status>("\"in-progress\"").unwrap(), Status::InProgress);
        assert_eq!(Status::InProgress.as_str(), "in-progress");
    }

    #[test]
    fn bug_round_trips_with_original_field_names() {
        let bug = Bug {
            id: Uuid::new_v4(),
            title: "Login button unresponsive".to_string(),
            description: "Clicking login does nothing on Safari".to_string(),
            severity: Severity::High,
            status: Status::Open,
            assigned_to: "jamie".to_string(),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
            deadline: None,
            is_resolved: false,
            comments: vec![],
            activity_logs: vec![],
            screenshots: vec![],
            created_by: "a@x.com".to_string(),
        };

        let json = serde_json::to_value(&bug).unwrap();
        assert!(json.get("assignedTo").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("isResolved").is_some());
        assert!(json.get("deadline").is_none());

        let back: Bug = serde_json::from_value(json).unwrap();
        assert_eq!(back, bug);
    }

    #[test]
    fn default_role_is_developer() {
        assert_eq!(Role::default(), Role::Developer);
    }

    #[test]
    fn session_projects_into_a_developer_user() {
        let session = Session {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            created_at: 1_700_000_000_000,
        };

        let user = User::from(&session);
        assert_eq!(user.id, session.id);
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, Role::Developer);
        assert_eq!(user.created_at, session.created_at);
    }
}
