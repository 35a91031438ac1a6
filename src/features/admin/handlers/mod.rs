mod admin_handler;

pub use admin_handler::{__path_list_issues, list_issues};
