mod issue;

pub use issue::{CreateIssue, IssueCategory, IssuePriority, IssueRecord, IssueStatus, UpdateIssue};
