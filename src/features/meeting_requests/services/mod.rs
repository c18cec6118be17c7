pub mod conflict_checker;
pub mod lifecycle;
mod meeting_request_service;

pub use conflict_checker::ConflictChecker;
pub use meeting_request_service::MeetingRequestService;
