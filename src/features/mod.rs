pub mod meeting_requests;
pub mod notifications;
