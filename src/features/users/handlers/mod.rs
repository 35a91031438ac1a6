pub mod user_handler;

pub use user_handler::{__path_get_user_info, __path_update_user, get_user_info, update_user};
