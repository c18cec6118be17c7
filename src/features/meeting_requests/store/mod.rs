//! Storage interface for meeting requests.
//!
//! The lifecycle service only talks to [`RequestStore`]; the in-memory
//! implementation backs tests and single-session use, and a durable backend
//! can be dropped in behind the same trait.

mod memory;

pub use memory::MemoryRequestStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::meeting_requests::models::{
    MeetingRequest, MeetingRequestPatch, MeetingStatus, NewMeetingRequest,
};

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Store a new pending request, assigning its id and creation time.
    async fn create(&self, new: NewMeetingRequest) -> Result<MeetingRequest>;

    /// Fetch a request, or `AppError::NotFound`.
    async fn get(&self, id: Uuid) -> Result<MeetingRequest>;

    /// Apply `patch` to the stored request and return the updated record.
    ///
    /// If the patch carries a guard and the stored status no longer matches
    /// it, nothing is written and `AppError::InvalidTransition` is returned.
    async fn update(&self, id: Uuid, patch: MeetingRequestPatch) -> Result<MeetingRequest>;

    /// All requests matching `filter`, newest first.
    async fn list(&self, filter: &MeetingRequestFilter) -> Result<Vec<MeetingRequest>>;
}

/// Criteria for [`RequestStore::list`]. An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct MeetingRequestFilter {
    pub status: Option<MeetingStatus>,
    pub requester_id: Option<String>,
    /// Case-insensitive substring of the title or description
    pub search: Option<String>,
}

impl MeetingRequestFilter {
    pub fn with_status(status: MeetingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, request: &MeetingRequest) -> bool {
        if self.status.is_some_and(|s| s != request.status) {
            return false;
        }
        if self
            .requester_id
            .as_deref()
            .is_some_and(|id| id != request.requester_id)
        {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_title = request.title.to_lowercase().contains(&needle);
            let in_description = request
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_request;

    #[test]
    fn test_empty_filter_matches_all() {
        let request = sample_request("Budget Review");
        assert!(MeetingRequestFilter::default().matches(&request));
    }

    #[test]
    fn test_filter_by_status_and_requester() {
        let request = sample_request("Budget Review");

        assert!(MeetingRequestFilter::with_status(MeetingStatus::Pending).matches(&request));
        assert!(!MeetingRequestFilter::with_status(MeetingStatus::Scheduled).matches(&request));

        let filter = MeetingRequestFilter {
            requester_id: Some("someone-else".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&request));
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let mut request = sample_request("Budget Review");
        request.description = Some("Quarterly numbers for finance".to_string());

        let search = |s: &str| MeetingRequestFilter {
            search: Some(s.to_string()),
            ..Default::default()
        };
        assert!(search("budget").matches(&request));
        assert!(search("FINANCE").matches(&request));
        assert!(search("   ").matches(&request));
        assert!(!search("hiring").matches(&request));
    }
}
