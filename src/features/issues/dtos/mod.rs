mod issue_dto;
mod vote_dto;

pub use issue_dto::*;
pub use vote_dto::*;
