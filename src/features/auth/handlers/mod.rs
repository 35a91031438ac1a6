pub mod auth_handler;

pub use auth_handler::{
    __path_obtain_token, __path_refresh_token, __path_register_admin, __path_register_user,
    obtain_token, refresh_token, register_admin, register_user,
};
