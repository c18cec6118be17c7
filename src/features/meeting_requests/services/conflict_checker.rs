use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::meeting_requests::models::{MeetingRequest, MeetingStatus};
use crate::features::meeting_requests::store::{MeetingRequestFilter, RequestStore};
use crate::shared::time::same_day_and_hour;

/// Scheduled requests, other than `excluding`, booked in the same day and hour as `candidate`.
///
/// Only the hour is compared, so 14:00 and 14:30 collide while 14:59 and
/// 15:01 do not.
pub fn find_conflicts<'a>(
    candidate: NaiveDateTime,
    excluding: Uuid,
    requests: impl IntoIterator<Item = &'a MeetingRequest>,
) -> Vec<&'a MeetingRequest> {
    requests
        .into_iter()
        .filter(|r| r.status == MeetingStatus::Scheduled && r.id != excluding)
        .filter(|r| {
            r.scheduled_time
                .is_some_and(|time| same_day_and_hour(time, candidate))
        })
        .collect()
}

/// Advisory double-booking check over a snapshot of the store.
///
/// The result is a warning for the admin; it never blocks a transition.
pub struct ConflictChecker {
    store: Arc<dyn RequestStore>,
}

impl ConflictChecker {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }

    /// Ids of scheduled requests colliding with `candidate`.
    pub async fn conflicting_ids(
        &self,
        candidate: NaiveDateTime,
        excluding: Uuid,
    ) -> Result<Vec<Uuid>> {
        let scheduled = self
            .store
            .list(&MeetingRequestFilter::with_status(MeetingStatus::Scheduled))
            .await?;

        Ok(find_conflicts(candidate, excluding, &scheduled)
            .into_iter()
            .map(|r| r.id)
            .collect())
    }

    pub async fn has_conflict(&self, candidate: NaiveDateTime, excluding: Uuid) -> Result<bool> {
        Ok(!self.conflicting_ids(candidate, excluding).await?.is_empty())
    }
}
