//! Status transition rules for meeting requests.
//!
//! ```text
//! pending ──approve+schedule──▶ scheduled ──mark ended──▶ ended ──add summary──▶ completed
//!    │                           ▲     │
//!    └──reject──▶ rejected       └─────┘ reschedule
//! ```
//!
//! Everything here is pure: [`plan`] checks the current status, validates
//! the caller's input and returns the patch to write. Nothing is applied
//! until the caller hands that patch to a store, so a failed check never
//! leaves a partial write behind.

use chrono::NaiveDateTime;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::meeting_requests::models::{
    Document, LifecycleAction, MeetingRequest, MeetingRequestPatch, MeetingStatus,
    TransitionGuard,
};
use crate::shared::time::parse_datetime;
use crate::shared::validation::normalize_optional_text;

/// A status-changing action together with its input
#[derive(Debug, Clone)]
pub enum Transition {
    ApproveAndSchedule {
        scheduled_time: Option<String>,
        admin_notes: Option<String>,
    },
    Reject {
        admin_notes: Option<String>,
    },
    Reschedule {
        scheduled_time: Option<String>,
        admin_notes: Option<String>,
    },
    MarkEnded,
    AddSummary {
        document: Document,
    },
}

impl Transition {
    pub fn action(&self) -> LifecycleAction {
        match self {
            Transition::ApproveAndSchedule { .. } => LifecycleAction::ApproveAndSchedule,
            Transition::Reject { .. } => LifecycleAction::Reject,
            Transition::Reschedule { .. } => LifecycleAction::Reschedule,
            Transition::MarkEnded => LifecycleAction::MarkEnded,
            Transition::AddSummary { .. } => LifecycleAction::AddSummary,
        }
    }
}

/// The single status from which `action` may be taken.
pub fn required_status(action: LifecycleAction) -> MeetingStatus {
    match action {
        LifecycleAction::ApproveAndSchedule | LifecycleAction::Reject | LifecycleAction::Edit => {
            MeetingStatus::Pending
        }
        LifecycleAction::Reschedule | LifecycleAction::MarkEnded => MeetingStatus::Scheduled,
        LifecycleAction::AddSummary | LifecycleAction::RequestSummary => MeetingStatus::Ended,
    }
}

/// The status `action` leads to, or `None` for actions that keep the status.
pub fn target_status(action: LifecycleAction) -> Option<MeetingStatus> {
    match action {
        LifecycleAction::ApproveAndSchedule => Some(MeetingStatus::Scheduled),
        LifecycleAction::Reject => Some(MeetingStatus::Rejected),
        LifecycleAction::MarkEnded => Some(MeetingStatus::Ended),
        LifecycleAction::AddSummary => Some(MeetingStatus::Completed),
        LifecycleAction::Reschedule | LifecycleAction::Edit | LifecycleAction::RequestSummary => {
            None
        }
    }
}

/// Actions a UI may offer for a request in `status`.
pub fn available_actions(status: MeetingStatus) -> Vec<LifecycleAction> {
    [
        LifecycleAction::ApproveAndSchedule,
        LifecycleAction::Reject,
        LifecycleAction::Reschedule,
        LifecycleAction::MarkEnded,
        LifecycleAction::AddSummary,
        LifecycleAction::Edit,
        LifecycleAction::RequestSummary,
    ]
    .into_iter()
    .filter(|action| required_status(*action) == status)
    .collect()
}

/// Whether a request may move directly from `from` to `to`.
pub fn can_transition(from: MeetingStatus, to: MeetingStatus) -> bool {
    matches!(
        (from, to),
        (MeetingStatus::Pending, MeetingStatus::Scheduled)
            | (MeetingStatus::Pending, MeetingStatus::Rejected)
            | (MeetingStatus::Scheduled, MeetingStatus::Scheduled)
            | (MeetingStatus::Scheduled, MeetingStatus::Ended)
            | (MeetingStatus::Ended, MeetingStatus::Completed)
    )
}

/// Fail with `InvalidTransition` unless `request` is in the status `action` needs.
pub fn ensure_allowed(request: &MeetingRequest, action: LifecycleAction) -> Result<()> {
    if request.status == required_status(action) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            action,
            status: request.status,
        })
    }
}

/// Check and validate `transition` against `request`, returning the patch to write.
pub fn plan(request: &MeetingRequest, transition: Transition) -> Result<MeetingRequestPatch> {
    let action = transition.action();
    ensure_allowed(request, action)?;

    let mut patch = MeetingRequestPatch {
        guard: Some(TransitionGuard {
            action,
            expected: request.status,
        }),
        status: target_status(action),
        ..Default::default()
    };

    match transition {
        Transition::ApproveAndSchedule {
            scheduled_time,
            admin_notes,
        }
        | Transition::Reschedule {
            scheduled_time,
            admin_notes,
        } => {
            patch.scheduled_time = Some(require_scheduled_time(scheduled_time.as_deref())?);
            patch.admin_notes = normalize_optional_text(admin_notes).map(Some);
        }
        Transition::Reject { admin_notes } => {
            patch.admin_notes = normalize_optional_text(admin_notes).map(Some);
        }
        Transition::MarkEnded => {}
        Transition::AddSummary { document } => {
            document.validate()?;
            patch.meeting_summary_file = Some(document);
        }
    }

    Ok(patch)
}

/// Parse the scheduled time an admin entered, which must name a date and time.
pub fn require_scheduled_time(input: Option<&str>) -> Result<NaiveDateTime> {
    let input = input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("scheduled_time is required".to_string()))?;

    parse_datetime(input).ok_or_else(|| {
        AppError::Validation(format!(
            "scheduled_time '{}' is not a valid date and time",
            input
        ))
    })
}
