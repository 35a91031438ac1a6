mod issue_service;
mod vote_service;

pub use issue_service::{IssueService, ISSUE_SELECT};
pub use vote_service::VoteService;
