//! Bug reports: records, repository, filtering, and dashboard stats.

pub mod filter;
pub mod model;
pub mod repo;
pub mod stats;

pub use self::filter::BugFilter;
pub use self::model::{ActivityEntry, Bug, BugDraft, Comment, Role, Severity, Status, User};
pub use self::repo::BugRepository;
pub use self::stats::{SeverityBreakdown, StatusBreakdown};
