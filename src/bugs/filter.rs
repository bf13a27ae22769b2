//! List filtering, matching the original list view's predicate: exact
//! status/severity when set, case-insensitive substring on the assignee, and
//! case-insensitive search over title or description.

use crate::bugs::model::{Bug, Severity, Status};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BugFilter {
    status: Option<Status>,
    severity: Option<Severity>,
    assigned_to: Option<String>,
    search: String,
}

impl BugFilter {
    /// Matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn with_assigned_to(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn matches(&self, bug: &Bug) -> bool {
        let matches_status = self.status.map_or(true, |status| bug.status == status);
        let matches_severity = self.severity.map_or(true, |severity| bug.severity == severity);
        let matches_assigned = self.assigned_to.as_ref().map_or(true, |assignee| {
            bug.assigned_to.to_lowercase().contains(&assignee.to_lowercase())
        });
        let search = self.search.to_lowercase();
        let matches_search = bug.title.to_lowercase().contains(&search)
            || bug.description.to_lowercase().contains(&search);

        matches_status && matches_severity && matches_assigned && matches_search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bugs::model::BugDraft;
    use uuid::Uuid;

    fn bug(title: &str, description: &str, status: Status, severity: Severity, assignee: &str) -> Bug {
        let draft = BugDraft::new(title, description)
            .with_status(status)
            .with_severity(severity)
            .with_assigned_to(assignee);
        Bug {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            status: draft.status,
            assigned_to: draft.assigned_to,
            created_at: 0,
            updated_at: 0,
            deadline: None,
            is_resolved: false,
            comments: vec![],
            activity_logs: vec![],
            screenshots: vec![],
            created_by: String::new(),
        }
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = BugFilter::new();
        assert!(filter.matches(&bug("a", "b", Status::Open, Severity::Low, "")));
        assert!(filter.matches(&bug("a", "b", Status::Closed, Severity::High, "sam")));
    }

    #[test]
    fn status_and_severity_are_exact() {
        let filter = BugFilter::new()
            .with_status(Status::InProgress)
            .with_severity(Severity::High);

        assert!(filter.matches(&bug("a", "b", Status::InProgress, Severity::High, "")));
        assert!(!filter.matches(&bug("a", "b", Status::Open, Severity::High, "")));
        assert!(!filter.matches(&bug("a", "b", Status::InProgress, Severity::Low, "")));
    }

    #[test]
    fn assignee_is_a_case_insensitive_substring() {
        let filter = BugFilter::new().with_assigned_to("Sam");
        assert!(filter.matches(&bug("a", "b", Status::Open, Severity::Low, "samantha")));
        assert!(!filter.matches(&bug("a", "b", Status::Open, Severity::Low, "jamie")));
    }

    #[test]
    fn search_covers_title_and_description() {
        let filter = BugFilter::new().with_search("LOGIN");
        assert!(filter.matches(&bug("Login broken", "x", Status::Open, Severity::Low, "")));
        assert!(filter.matches(&bug("x", "breaks the login form", Status::Open, Severity::Low, "")));
        assert!(!filter.matches(&bug("x", "y", Status::Open, Severity::Low, "")));
    }
}
