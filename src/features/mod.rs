pub mod admin;
pub mod auth;
pub mod classification;
pub mod comments;
pub mod dashboard;
pub mod issues;
pub mod users;
