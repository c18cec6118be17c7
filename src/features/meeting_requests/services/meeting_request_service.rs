use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::core::config::{AppConfig, Config};
use crate::core::error::{AppError, Result};
use crate::features::meeting_requests::dtos::{
    ApproveMeetingRequestDto, CreateMeetingRequestDto, MeetingRequestQueryParams,
    MeetingRequestSortField, RejectMeetingRequestDto, RescheduleMeetingRequestDto,
    UpdateAdminNotesDto, UpdateMeetingRequestDto,
};
use crate::features::meeting_requests::models::{
    Document, LifecycleAction, MeetingRequest, MeetingRequestPatch, MeetingStatus,
    NewMeetingRequest, Requester, TransitionGuard,
};
use crate::features::meeting_requests::services::conflict_checker::ConflictChecker;
use crate::features::meeting_requests::services::lifecycle::{self, Transition};
use crate::features::meeting_requests::store::{
    MeetingRequestFilter, MemoryRequestStore, RequestStore,
};
use crate::features::notifications::models::Notification;
use crate::features::notifications::{MemoryNotificationSink, NotificationService};
use crate::shared::time::{parse_datetime, parse_deadline};
use crate::shared::types::{Paginated, SortDirection};
use crate::shared::validation::normalize_optional_text;

/// Service for meeting request operations.
///
/// Every operation reads the current record, checks it against the lifecycle
/// rules and only then writes; a failed check leaves the store untouched.
pub struct MeetingRequestService {
    store: Arc<dyn RequestStore>,
    conflicts: ConflictChecker,
    notifications: Arc<NotificationService>,
    default_page_size: i64,
}

impl MeetingRequestService {
    pub fn new(
        store: Arc<dyn RequestStore>,
        notifications: Arc<NotificationService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            conflicts: ConflictChecker::new(Arc::clone(&store)),
            store,
            notifications,
            default_page_size: config.default_page_size,
        }
    }

    /// Wire a service over fresh in-memory request and notification stores.
    pub fn in_memory(config: &Config) -> Self {
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MemoryNotificationSink::new()),
            &config.notifications,
        ));
        Self::new(
            Arc::new(MemoryRequestStore::new()),
            notifications,
            &config.app,
        )
    }

    pub fn notifications(&self) -> &Arc<NotificationService> {
        &self.notifications
    }

    // =========================================================================
    // REQUESTER OPERATIONS
    // =========================================================================

    /// Submit a new request; it starts out pending.
    pub async fn submit_request(
        &self,
        requester: &Requester,
        dto: CreateMeetingRequestDto,
    ) -> Result<MeetingRequest> {
        dto.validate()?;

        if requester.id.trim().is_empty() {
            return Err(AppError::Validation("requester id is required".to_string()));
        }
        let title = require_title(&dto.title)?;
        let deadline = require_deadline(&dto.deadline)?;
        validate_documents(&dto.documents)?;

        let request = self
            .store
            .create(NewMeetingRequest {
                title,
                description: normalize_optional_text(dto.description),
                requester: requester.clone(),
                documents: dto.documents,
                deadline,
            })
            .await?;

        tracing::info!(
            "Meeting request submitted: id={}, requester={}",
            request.id,
            request.requester_id
        );
        Ok(request)
    }

    /// Change title, description, deadline or documents of a pending request.
    ///
    /// Only the original requester may edit.
    pub async fn edit_request(
        &self,
        id: Uuid,
        requester: &Requester,
        dto: UpdateMeetingRequestDto,
    ) -> Result<MeetingRequest> {
        let current = self.store.get(id).await?;
        lifecycle::ensure_allowed(&current, LifecycleAction::Edit)?;

        if current.requester_id != requester.id {
            return Err(AppError::Forbidden(format!(
                "Meeting request '{}' belongs to another requester",
                id
            )));
        }

        dto.validate()?;

        let mut patch = MeetingRequestPatch {
            guard: Some(TransitionGuard {
                action: LifecycleAction::Edit,
                expected: current.status,
            }),
            ..Default::default()
        };
        if let Some(title) = dto.title.as_deref() {
            patch.title = Some(require_title(title)?);
        }
        if let Some(description) = dto.description {
            patch.description = Some(normalize_optional_text(Some(description)));
        }
        if let Some(deadline) = dto.deadline.as_deref() {
            patch.deadline = Some(require_deadline(deadline)?);
        }
        if let Some(documents) = dto.documents {
            validate_documents(&documents)?;
            patch.documents = Some(documents);
        }

        let updated = self.store.update(id, patch).await?;
        tracing::info!("Meeting request edited: id={}", id);
        Ok(updated)
    }

    pub async fn get(&self, id: Uuid) -> Result<MeetingRequest> {
        self.store.get(id).await
    }

    /// Filtered, sorted and paginated listing.
    pub async fn list(
        &self,
        query: &MeetingRequestQueryParams,
    ) -> Result<Paginated<MeetingRequest>> {
        let filter = MeetingRequestFilter {
            status: query.status,
            requester_id: query.requester_id.clone(),
            search: query.search.clone(),
        };
        let mut requests = self.store.list(&filter).await?;

        sort_requests(&mut requests, query.sort_by, query.sort);

        Ok(Paginated::from_all(
            requests,
            &query.pagination(self.default_page_size),
        ))
    }

    // =========================================================================
    // ADMIN OPERATIONS
    // =========================================================================

    /// Approve a pending request and set its meeting time.
    pub async fn approve_and_schedule(
        &self,
        id: Uuid,
        dto: ApproveMeetingRequestDto,
    ) -> Result<MeetingRequest> {
        dto.validate()?;
        let transition = Transition::ApproveAndSchedule {
            scheduled_time: dto.scheduled_time,
            admin_notes: dto.admin_notes,
        };

        self.apply_transition(id, transition).await
    }

    pub async fn reject(&self, id: Uuid, dto: RejectMeetingRequestDto) -> Result<MeetingRequest> {
        dto.validate()?;
        self.apply_transition(
            id,
            Transition::Reject {
                admin_notes: dto.admin_notes,
            },
        )
        .await
    }

    /// Move a scheduled meeting and tell the requester.
    ///
    /// The notification is sent at most once. If the sink fails after the
    /// new time is committed, the failure is logged and the reschedule stands.
    pub async fn reschedule(
        &self,
        id: Uuid,
        dto: RescheduleMeetingRequestDto,
    ) -> Result<MeetingRequest> {
        dto.validate()?;
        let current = self.store.get(id).await?;
        let patch = lifecycle::plan(
            &current,
            Transition::Reschedule {
                scheduled_time: dto.scheduled_time,
                admin_notes: dto.admin_notes,
            },
        )?;

        // Render before writing so a template failure cannot follow a committed change
        let new_time = patch.scheduled_time.ok_or_else(|| {
            tracing::error!("Reschedule of {} planned without a time", id);
            AppError::Internal("reschedule planned without a time".to_string())
        })?;
        let message = self
            .notifications
            .render_rescheduled(&current.title, new_time)?;

        let updated = self.commit(&current, patch).await?;
        if let Err(e) = self.notifications.emit(&updated.requester_id, message).await {
            tracing::error!(
                "Meeting request {} rescheduled but notifying {} failed: {}",
                updated.id,
                updated.requester_id,
                e
            );
        }

        Ok(updated)
    }

    /// Record that a scheduled meeting has taken place.
    pub async fn mark_ended(&self, id: Uuid) -> Result<MeetingRequest> {
        self.apply_transition(id, Transition::MarkEnded).await
    }

    /// Attach the meeting summary to an ended request, completing it.
    pub async fn add_summary(&self, id: Uuid, document: Document) -> Result<MeetingRequest> {
        self.apply_transition(id, Transition::AddSummary { document })
            .await
    }

    /// Replace the admin notes. Allowed in every status.
    pub async fn update_notes(
        &self,
        id: Uuid,
        dto: UpdateAdminNotesDto,
    ) -> Result<MeetingRequest> {
        dto.validate()?;
        let patch = MeetingRequestPatch {
            admin_notes: Some(normalize_optional_text(dto.admin_notes)),
            ..Default::default()
        };

        let updated = self.store.update(id, patch).await?;
        tracing::info!("Admin notes updated: id={}", id);
        Ok(updated)
    }

    /// Remind the requester of an ended meeting to upload its summary.
    pub async fn request_summary(&self, id: Uuid) -> Result<Notification> {
        let current = self.store.get(id).await?;
        lifecycle::ensure_allowed(&current, LifecycleAction::RequestSummary)?;

        let message = self
            .notifications
            .render_summary_requested(&current.title, current.scheduled_time)?;
        self.notifications
            .emit(&current.requester_id, message)
            .await
    }

    /// End every scheduled meeting whose time is at or before `now`.
    ///
    /// Requests another caller moved on in the meantime are skipped.
    pub async fn end_elapsed(&self, now: NaiveDateTime) -> Result<Vec<MeetingRequest>> {
        let scheduled = self
            .store
            .list(&MeetingRequestFilter::with_status(MeetingStatus::Scheduled))
            .await?;

        let mut ended = Vec::new();
        for request in scheduled
            .iter()
            .filter(|r| r.scheduled_time.is_some_and(|t| t <= now))
        {
            match self.apply_transition(request.id, Transition::MarkEnded).await {
                Ok(updated) => ended.push(updated),
                Err(AppError::InvalidTransition { status, .. }) => {
                    tracing::debug!(
                        "Skipping meeting request {}: already {}",
                        request.id,
                        status
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ended)
    }

    /// Whether `candidate_time` falls in the same day and hour as another scheduled meeting.
    pub async fn check_conflict(&self, candidate_time: &str, excluding: Uuid) -> Result<bool> {
        let candidate = parse_datetime(candidate_time).ok_or_else(|| {
            AppError::Validation(format!(
                "'{}' is not a valid date and time",
                candidate_time
            ))
        })?;

        self.conflicts.has_conflict(candidate, excluding).await
    }

    /// Actions currently valid for the request.
    pub async fn available_actions(&self, id: Uuid) -> Result<Vec<LifecycleAction>> {
        let current = self.store.get(id).await?;
        Ok(lifecycle::available_actions(current.status))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn apply_transition(&self, id: Uuid, transition: Transition) -> Result<MeetingRequest> {
        let current = self.store.get(id).await?;
        let patch = lifecycle::plan(&current, transition)?;
        self.commit(&current, patch).await
    }

    /// Write a planned patch, consulting the conflict checker first when it sets a time.
    async fn commit(
        &self,
        current: &MeetingRequest,
        patch: MeetingRequestPatch,
    ) -> Result<MeetingRequest> {
        if let Some(time) = patch.scheduled_time {
            let conflicts = self.conflicts.conflicting_ids(time, current.id).await?;
            if !conflicts.is_empty() {
                tracing::warn!(
                    "Meeting request {} scheduled at {} overlaps the same hour as {:?}",
                    current.id,
                    time,
                    conflicts
                );
            }
        }

        let action = patch.guard.map(|g| g.action);
        let updated = self.store.update(current.id, patch).await.map_err(|e| {
            if let AppError::InvalidTransition { action, status } = &e {
                tracing::warn!(
                    "Meeting request {} moved to {} before it could {}",
                    current.id,
                    status,
                    action
                );
            }
            e
        })?;

        tracing::info!(
            "Meeting request transition committed: id={}, action={:?}, {} -> {}",
            updated.id,
            action,
            current.status,
            updated.status
        );
        Ok(updated)
    }
}

fn require_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(title.to_string())
}

fn require_deadline(deadline: &str) -> Result<NaiveDateTime> {
    parse_deadline(deadline).ok_or_else(|| {
        AppError::Validation(format!("deadline '{}' is not a valid date", deadline))
    })
}

fn validate_documents(documents: &[Document]) -> Result<()> {
    for document in documents {
        document.validate()?;
    }
    Ok(())
}

/// Order requests in place; entries without a scheduled time sort last either way.
fn sort_requests(
    requests: &mut [MeetingRequest],
    field: MeetingRequestSortField,
    direction: SortDirection,
) {
    requests.sort_by(|a, b| {
        let ordering = match field {
            MeetingRequestSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            MeetingRequestSortField::Deadline => a.deadline.cmp(&b.deadline),
            MeetingRequestSortField::ScheduledTime => {
                match (a.scheduled_time, b.scheduled_time) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    (Some(_), None) => return std::cmp::Ordering::Less,
                    (None, Some(_)) => return std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            }
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
