//! Local user accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/user/info` | Profile of the authenticated user |
//! | PUT | `/api/user/update` | Update username, email, password or profile picture (multipart) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
