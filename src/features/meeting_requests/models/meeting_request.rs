use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Document;
use crate::core::error::{AppError, Result};

/// Lifecycle status of a meeting request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Scheduled,
    Ended,
    Completed,
    Rejected,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Pending => write!(f, "pending"),
            MeetingStatus::Scheduled => write!(f, "scheduled"),
            MeetingStatus::Ended => write!(f, "ended"),
            MeetingStatus::Completed => write!(f, "completed"),
            MeetingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl MeetingStatus {
    /// Statuses in which the request carries a scheduled time
    pub fn has_schedule(&self) -> bool {
        matches!(
            self,
            MeetingStatus::Scheduled | MeetingStatus::Ended | MeetingStatus::Completed
        )
    }

    /// No lifecycle action leaves these statuses
    pub fn is_terminal(&self) -> bool {
        matches!(self, MeetingStatus::Completed | MeetingStatus::Rejected)
    }
}

/// An operation that is only valid from particular statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    ApproveAndSchedule,
    Reject,
    Reschedule,
    MarkEnded,
    AddSummary,
    Edit,
    RequestSummary,
}

impl std::fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleAction::ApproveAndSchedule => write!(f, "approve and schedule"),
            LifecycleAction::Reject => write!(f, "reject"),
            LifecycleAction::Reschedule => write!(f, "reschedule"),
            LifecycleAction::MarkEnded => write!(f, "end"),
            LifecycleAction::AddSummary => write!(f, "add a summary to"),
            LifecycleAction::Edit => write!(f, "edit"),
            LifecycleAction::RequestSummary => write!(f, "request a summary for"),
        }
    }
}

/// Identity of the employee submitting a request, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub name: String,
}

impl Requester {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A request for a meeting, as held by a [`RequestStore`](crate::RequestStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequest {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requester_id: String,
    pub requester_name: String,
    pub documents: Vec<Document>,
    pub deadline: NaiveDateTime,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub admin_notes: Option<String>,
    pub meeting_summary_file: Option<Document>,
}

impl MeetingRequest {
    /// Build the pending record for a validated draft.
    pub fn from_new(new: NewMeetingRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: new.title,
            description: new.description,
            requester_id: new.requester.id,
            requester_name: new.requester.name,
            documents: new.documents,
            deadline: new.deadline,
            status: MeetingStatus::Pending,
            created_at: now,
            updated_at: now,
            scheduled_time: None,
            admin_notes: None,
            meeting_summary_file: None,
        }
    }

    /// Apply every field present in `patch`.
    ///
    /// The guard is not checked here; stores check it before calling.
    pub fn apply(&mut self, patch: MeetingRequestPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(documents) = patch.documents {
            self.documents = documents;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(scheduled_time) = patch.scheduled_time {
            self.scheduled_time = Some(scheduled_time);
        }
        if let Some(admin_notes) = patch.admin_notes {
            self.admin_notes = admin_notes;
        }
        if let Some(summary) = patch.meeting_summary_file {
            self.meeting_summary_file = Some(summary);
        }
        self.updated_at = Utc::now();
    }

    /// Whether the status/field invariants hold for this record.
    pub fn is_consistent(&self) -> bool {
        let schedule_ok = self.status.has_schedule() == self.scheduled_time.is_some();
        let summary_ok = self.meeting_summary_file.is_none()
            || matches!(
                self.status,
                MeetingStatus::Ended | MeetingStatus::Completed
            );
        schedule_ok && summary_ok
    }
}

/// A validated draft, ready to be stored as a new pending request
#[derive(Debug, Clone)]
pub struct NewMeetingRequest {
    pub title: String,
    pub description: Option<String>,
    pub requester: Requester,
    pub documents: Vec<Document>,
    pub deadline: NaiveDateTime,
}

/// The status a lifecycle patch was planned against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionGuard {
    pub action: LifecycleAction,
    pub expected: MeetingStatus,
}

impl TransitionGuard {
    /// Whether `request` is still in the status the patch was planned against.
    pub fn check(&self, request: &MeetingRequest) -> Result<()> {
        if request.status == self.expected {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                action: self.action,
                status: request.status,
            })
        }
    }
}

/// Field-level change to a stored request.
///
/// `None` leaves a field untouched. For the optional text fields the inner
/// `Option` is the new value, so `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingRequestPatch {
    /// The write is refused if the stored record has moved on from the
    /// status this patch was planned against.
    pub guard: Option<TransitionGuard>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub documents: Option<Vec<Document>>,
    pub deadline: Option<NaiveDateTime>,
    pub status: Option<MeetingStatus>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub admin_notes: Option<Option<String>>,
    pub meeting_summary_file: Option<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{datetime, sample_new_request};

    #[test]
    fn test_from_new_is_pending_without_schedule() {
        let request = MeetingRequest::from_new(sample_new_request("Budget Review"));
        assert_eq!(request.status, MeetingStatus::Pending);
        assert!(request.scheduled_time.is_none());
        assert!(request.admin_notes.is_none());
        assert!(request.meeting_summary_file.is_none());
        assert_eq!(request.created_at, request.updated_at);
        assert!(request.is_consistent());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut request = MeetingRequest::from_new(sample_new_request("Budget Review"));
        let before = request.clone();

        request.apply(MeetingRequestPatch {
            status: Some(MeetingStatus::Scheduled),
            scheduled_time: Some(datetime("2025-02-20T10:00")),
            admin_notes: Some(Some("Room 4".to_string())),
            ..Default::default()
        });

        assert_eq!(request.status, MeetingStatus::Scheduled);
        assert_eq!(request.scheduled_time, Some(datetime("2025-02-20T10:00")));
        assert_eq!(request.admin_notes.as_deref(), Some("Room 4"));
        assert_eq!(request.title, before.title);
        assert_eq!(request.documents, before.documents);
        assert_eq!(request.created_at, before.created_at);
        assert!(request.is_consistent());
    }

    #[test]
    fn test_apply_can_clear_notes() {
        let mut request = MeetingRequest::from_new(sample_new_request("Budget Review"));
        request.admin_notes = Some("old".to_string());
        request.apply(MeetingRequestPatch {
            admin_notes: Some(None),
            ..Default::default()
        });
        assert!(request.admin_notes.is_none());
    }

    #[test]
    fn test_inconsistent_records() {
        let mut request = MeetingRequest::from_new(sample_new_request("Budget Review"));
        request.status = MeetingStatus::Scheduled;
        assert!(!request.is_consistent());

        let mut request = MeetingRequest::from_new(sample_new_request("Budget Review"));
        request.scheduled_time = Some(datetime("2025-02-20T10:00"));
        assert!(!request.is_consistent());
    }

    #[test]
    fn test_guard_rejects_moved_record() {
        let mut request = MeetingRequest::from_new(sample_new_request("Budget Review"));
        let guard = TransitionGuard {
            action: LifecycleAction::Reject,
            expected: MeetingStatus::Pending,
        };
        assert!(guard.check(&request).is_ok());

        request.status = MeetingStatus::Rejected;
        assert!(matches!(
            guard.check(&request),
            Err(AppError::InvalidTransition {
                action: LifecycleAction::Reject,
                status: MeetingStatus::Rejected,
            })
        ));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MeetingStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(MeetingStatus::Completed.to_string(), "completed");
        assert!(MeetingStatus::Rejected.is_terminal());
        assert!(!MeetingStatus::Ended.is_terminal());
    }
}
