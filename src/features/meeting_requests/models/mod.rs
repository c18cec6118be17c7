mod document;
mod meeting_request;

pub use document::Document;
pub use meeting_request::{
    LifecycleAction, MeetingRequest, MeetingRequestPatch, MeetingStatus, NewMeetingRequest,
    Requester, TransitionGuard,
};
