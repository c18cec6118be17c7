use chrono::NaiveDateTime;
use fake::{faker::lorem::en::Sentence, Fake};

use crate::features::meeting_requests::models::{
    Document, MeetingRequest, MeetingStatus, NewMeetingRequest, Requester,
};
use crate::shared::time::parse_datetime;

/// Parse a `2025-02-20T10:00` style literal.
pub fn datetime(s: &str) -> NaiveDateTime {
    parse_datetime(s).unwrap()
}

pub fn requester() -> Requester {
    Requester::new("emp-1", "Employee One")
}

pub fn sample_document(name: &str) -> Document {
    Document::new(name, format!("files/{}", name), "application/pdf")
}

pub fn sample_new_request(title: &str) -> NewMeetingRequest {
    NewMeetingRequest {
        title: title.to_string(),
        description: Some(Sentence(3..8).fake()),
        requester: requester(),
        documents: vec![sample_document("agenda.pdf")],
        deadline: datetime("2025-03-01T00:00"),
    }
}

pub fn sample_request(title: &str) -> MeetingRequest {
    MeetingRequest::from_new(sample_new_request(title))
}

/// A consistent request sitting in `status`.
pub fn request_in_status(status: MeetingStatus) -> MeetingRequest {
    let mut request = sample_request("Budget Review");
    request.status = status;
    if status.has_schedule() {
        request.scheduled_time = Some(datetime("2025-02-20T10:00"));
    }
    if status == MeetingStatus::Completed {
        request.meeting_summary_file = Some(sample_document("minutes.pdf"));
    }
    request
}

pub fn scheduled_at(time: &str) -> MeetingRequest {
    let mut request = request_in_status(MeetingStatus::Scheduled);
    request.scheduled_time = Some(datetime(time));
    request
}
