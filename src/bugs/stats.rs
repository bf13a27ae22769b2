//! Aggregate counts behind the dashboard's two charts: reports per status
//! and per severity.

use crate::bugs::model::{Bug, Severity, Status};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl StatusBreakdown {
    #[must_use]
    pub fn of(bugs: &[Bug]) -> Self {
        let mut breakdown = Self::default();
        for bug in bugs {
            match bug.status {
                Status::Open => breakdown.open += 1,
                Status::InProgress => breakdown.in_progress += 1,
                Status::Closed => breakdown.closed += 1,
            }
        }
        breakdown
    }

    /// `(label, count)` pairs in the chart's display order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, usize); 3] {
        [
            ("open", self.open),
            ("in-progress", self.in_progress),
            ("closed", self.closed),
        ]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.closed
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityBreakdown {
    #[must_use]
    pub fn of(bugs: &[Bug]) -> Self {
        let mut breakdown = Self::default();
        for bug in bugs {
            match bug.severity {
                Severity::High => breakdown.high += 1,
                Severity::Medium => breakdown.medium += 1,
                Severity::Low => breakdown.low += 1,
            }
        }
        breakdown
    }

    /// `(label, count)` pairs, highest severity first.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, usize); 3] {
        [("high", self.high), ("medium", self.medium), ("low", self.low)]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bugs::model::BugDraft;
    use uuid::Uuid;

    fn bug(status: Status, severity: Severity) -> Bug {
        let draft = BugDraft::new("t", "d").with_status(status).with_severity(severity);
        Bug {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            status: draft.status,
            assigned_to: String::new(),
            created_at: 0,
            updated_at: 0,
            deadline: None,
            is_resolved: status == Status::Closed,
            comments: vec![],
            activity_logs: vec![],
            screenshots: vec![],
            created_by: String::new(),
        }
    }

    #[test]
    fn breakdowns_count_every_bucket() {
        let bugs = vec![
            bug(Status::Open, Severity::High),
            bug(Status::Open, Severity::Low),
            bug(Status::InProgress, Severity::Medium),
            bug(Status::Closed, Severity::High),
        ];

        let status = StatusBreakdown::of(&bugs);
        assert_eq!(status, StatusBreakdown { open: 2, in_progress: 1, closed: 1 });
        assert_eq!(status.total(), 4);
        assert_eq!(status.entries()[1], ("in-progress", 1));

        let severity = SeverityBreakdown::of(&bugs);
        assert_eq!(severity, SeverityBreakdown { high: 2, medium: 1, low: 1 });
        assert_eq!(severity.entries()[0], ("high", 2));
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(StatusBreakdown::of(&[]).total(), 0);
        assert_eq!(SeverityBreakdown::of(&[]).total(), 0);
    }
}
