//! The bug repository: an in-memory list mirrored to scratch storage as one
//! JSON snapshot, reloaded on open and rewritten after every mutation.

use std::sync::Arc;
use tracing::{info, warn};
use ulid::Ulid;
use uuid::Uuid;

use crate::auth::clock::{Clock, SystemClock};
use crate::bugs::filter::BugFilter;
use crate::bugs::model::{ActivityEntry, Bug, BugDraft, Comment, Status};
use crate::storage::{ScratchStorage, StorageError};

const BUGS_KEY: &str = "cimo.bugs";

pub struct BugRepository {
    bugs: Vec<Bug>,
    storage: Arc<dyn ScratchStorage>,
    clock: Arc<dyn Clock>,
}

impl BugRepository {
    /// Open the repository, loading any existing snapshot from `storage`.
    /// An unreadable snapshot is discarded with a warning rather than
    /// blocking the list.
    ///
    /// # Errors
    /// Returns `StorageError` when the storage itself cannot be read.
    pub fn open(storage: Arc<dyn ScratchStorage>) -> Result<Self, StorageError> {
        let bugs = match storage.get(BUGS_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(bugs) => bugs,
                Err(err) => {
                    warn!("discarding unreadable bug snapshot: {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            bugs,
            storage,
            clock: Arc::new(SystemClock),
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn persist(&self) -> Result<(), StorageError> {
        let snapshot = serde_json::to_string(&self.bugs)?;
        self.storage.set(BUGS_KEY, &snapshot)
    }

    fn activity(&self, bug_id: Uuid, action: &str, details: String) -> ActivityEntry {
        ActivityEntry {
            id: Ulid::new(),
            bug_id,
            action: action.to_string(),
            details,
            timestamp: self.clock.now_millis(),
        }
    }

    /// Create a report from `draft`.
    ///
    /// # Errors
    /// Returns `StorageError` when the snapshot cannot be persisted.
    pub fn add(&mut self, draft: BugDraft) -> Result<Bug, StorageError> {
        let now = self.clock.now_millis();
        let id = Uuid::new_v4();
        let created = self.activity(id, "created", format!("Bug reported by {}", draft.created_by));

        let bug = Bug {
            id,
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            status: draft.status,
            assigned_to: draft.assigned_to,
            created_at: now,
            updated_at: now,
            deadline: draft.deadline,
            is_resolved: draft.status == Status::Closed,
            comments: Vec::new(),
            activity_logs: vec![created],
            screenshots: draft.screenshots,
            created_by: draft.created_by,
        };

        self.bugs.push(bug.clone());
        self.persist()?;
        info!(bug_id = %bug.id, title = %bug.title, "bug created");
        Ok(bug)
    }

    /// Replace the stored report with `updated` (matched by id), stamping
    /// `updated_at` and appending activity entries for status and assignee
    /// changes. Returns `None` for an unknown id.
    ///
    /// # Errors
    /// Returns `StorageError` when the snapshot cannot be persisted.
    pub fn update(&mut self, mut updated: Bug) -> Result<Option<Bug>, StorageError> {
        let now = self.clock.now_millis();
        let Some(existing) = self.bugs.iter_mut().find(|bug| bug.id == updated.id) else {
            return Ok(None);
        };

        updated.updated_at = now;
        updated.is_resolved = updated.status == Status::Closed;

        let mut trail = Vec::new();
        if existing.status != updated.status {
            trail.push((
                "status-changed",
                format!("Status changed from {} to {}", existing.status.as_str(), updated.status.as_str()),
            ));
        }
        if existing.assigned_to != updated.assigned_to {
            trail.push((
                "reassigned",
                format!("Reassigned from {} to {}", existing.assigned_to, updated.assigned_to),
            ));
        }

        *existing = updated;
        let id = existing.id;
        for (action, details) in trail {
            let entry = ActivityEntry {
                id: Ulid::new(),
                bug_id: id,
                action: action.to_string(),
                details,
                timestamp: now,
            };
            if let Some(bug) = self.bugs.iter_mut().find(|bug| bug.id == id) {
                bug.activity_logs.push(entry);
            }
        }

        self.persist()?;
        info!(bug_id = %id, "bug updated");
        Ok(self.get(id).cloned())
    }

    /// Remove a report. Returns `false` for an unknown id.
    ///
    /// # Errors
    /// Returns `StorageError` when the snapshot cannot be persisted.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let before = self.bugs.len();
        self.bugs.retain(|bug| bug.id != id);
        if self.bugs.len() == before {
            return Ok(false);
        }

        self.persist()?;
        info!(bug_id = %id, "bug deleted");
        Ok(true)
    }

    /// Append a comment and its activity entry. Returns `None` for an
    /// unknown id.
    ///
    /// # Errors
    /// Returns `StorageError` when the snapshot cannot be persisted.
    pub fn add_comment(
        &mut self,
        bug_id: Uuid,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Option<Comment>, StorageError> {
        let now = self.clock.now_millis();
        let author = author.into();
        let comment = Comment {
            id: Uuid::new_v4(),
            bug_id,
            text: text.into(),
            author: author.clone(),
            created_at: now,
        };
        let entry = self.activity(bug_id, "commented", format!("Comment added by {author}"));

        let Some(bug) = self.bugs.iter_mut().find(|bug| bug.id == bug_id) else {
            return Ok(None);
        };
        bug.comments.push(comment.clone());
        bug.activity_logs.push(entry);

        self.persist()?;
        Ok(Some(comment))
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Bug> {
        self.bugs.iter().find(|bug| bug.id == id)
    }

    /// Reports matching `filter`, in insertion order.
    #[must_use]
    pub fn list(&self, filter: &BugFilter) -> Vec<&Bug> {
        self.bugs.iter().filter(|bug| filter.matches(bug)).collect()
    }

    #[must_use]
    pub fn all(&self) -> &[Bug] {
        &self.bugs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }
}
