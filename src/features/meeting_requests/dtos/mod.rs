mod meeting_request_dto;

pub use meeting_request_dto::*;
