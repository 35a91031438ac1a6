mod prediction_dto;

pub use prediction_dto::*;
