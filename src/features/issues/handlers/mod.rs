pub mod issue_handler;
pub mod vote_handler;

pub use issue_handler::{
    __path_delete_issue, __path_get_issue_detail, __path_my_issues, __path_public_issues,
    __path_recent_activity, __path_report_issue, __path_update_issue, delete_issue,
    get_issue_detail, my_issues, public_issues, recent_activity, report_issue, update_issue,
};
pub use vote_handler::{
    __path_remove_vote, __path_upvote_issue, __path_user_voted_issues, remove_vote, upvote_issue,
    user_voted_issues,
};
