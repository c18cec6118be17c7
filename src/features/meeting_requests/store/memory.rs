use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{MeetingRequestFilter, RequestStore};
use crate::core::error::{AppError, Result};
use crate::features::meeting_requests::models::{
    MeetingRequest, MeetingRequestPatch, NewMeetingRequest,
};

/// In-memory request store.
///
/// Holds the collection for the current process only. The JSON snapshot
/// helpers let an embedding application persist it between sessions.
#[derive(Default)]
pub struct MemoryRequestStore {
    requests: RwLock<HashMap<Uuid, MeetingRequest>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize every request, oldest first.
    pub async fn export_json(&self) -> Result<String> {
        let requests = self.requests.read().await;
        let mut all: Vec<&MeetingRequest> = requests.values().collect();
        all.sort_by_key(|r| (r.created_at, r.id));
        Ok(serde_json::to_string(&all)?)
    }

    /// Replace the whole collection with a snapshot from [`export_json`](Self::export_json).
    ///
    /// The snapshot is parsed before anything is replaced. Returns the number
    /// of requests loaded.
    pub async fn import_json(&self, json: &str) -> Result<usize> {
        let loaded: Vec<MeetingRequest> = serde_json::from_str(json)?;

        if let Some(bad) = loaded.iter().find(|r| !r.is_consistent()) {
            return Err(AppError::Validation(format!(
                "Snapshot request '{}' has fields inconsistent with status {}",
                bad.id, bad.status
            )));
        }

        let count = loaded.len();
        let mut requests = self.requests.write().await;
        *requests = loaded.into_iter().map(|r| (r.id, r)).collect();

        tracing::info!("Imported {} meeting requests from snapshot", count);
        Ok(count)
    }
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn create(&self, new: NewMeetingRequest) -> Result<MeetingRequest> {
        let request = MeetingRequest::from_new(new);
        self.requests
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(request)
    }

    async fn get(&self, id: Uuid) -> Result<MeetingRequest> {
        tracing::debug!("Fetching meeting request {}", id);
        self.requests
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Meeting request '{}' not found", id)))
    }

    async fn update(&self, id: Uuid, patch: MeetingRequestPatch) -> Result<MeetingRequest> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Meeting request '{}' not found", id)))?;

        if let Some(guard) = patch.guard {
            guard.check(request)?;
        }

        request.apply(patch);
        Ok(request.clone())
    }

    async fn list(&self, filter: &MeetingRequestFilter) -> Result<Vec<MeetingRequest>> {
        let requests = self.requests.read().await;
        let mut matching: Vec<MeetingRequest> = requests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::meeting_requests::models::{
        LifecycleAction, MeetingStatus, TransitionGuard,
    };
    use crate::shared::test_helpers::{datetime, sample_new_request};

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let store = MemoryRequestStore::new();
        let a = store.create(sample_new_request("A")).await.unwrap();
        let b = store.create(sample_new_request("B")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.status, MeetingStatus::Pending);
        assert_eq!(store.get(a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryRequestStore::new();
        let result = store.get(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = MemoryRequestStore::new();
        let created = store.create(sample_new_request("A")).await.unwrap();

        let updated = store
            .update(
                created.id,
                MeetingRequestPatch {
                    title: Some("A (revised)".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "A (revised)");
        assert_eq!(store.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_with_stale_guard_writes_nothing() {
        let store = MemoryRequestStore::new();
        let created = store.create(sample_new_request("A")).await.unwrap();

        let stale = MeetingRequestPatch {
            guard: Some(TransitionGuard {
                action: LifecycleAction::MarkEnded,
                expected: MeetingStatus::Scheduled,
            }),
            status: Some(MeetingStatus::Ended),
            ..Default::default()
        };
        let result = store.update(created.id, stale).await;

        assert!(matches!(
            result,
            Err(AppError::InvalidTransition {
                action: LifecycleAction::MarkEnded,
                status: MeetingStatus::Pending,
            })
        ));
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryRequestStore::new();
        let result = store
            .update(Uuid::new_v4(), MeetingRequestPatch::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = MemoryRequestStore::new();
        let first = store.create(sample_new_request("First")).await.unwrap();
        let second = store.create(sample_new_request("Second")).await.unwrap();
        store
            .update(
                first.id,
                MeetingRequestPatch {
                    status: Some(MeetingStatus::Rejected),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let all = store.list(&MeetingRequestFilter::default()).await.unwrap();
        assert_eq!(
            all.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        let pending = store
            .list(&MeetingRequestFilter::with_status(MeetingStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_replaces_collection() {
        let source = MemoryRequestStore::new();
        let created = source.create(sample_new_request("A")).await.unwrap();
        let scheduled = source
            .update(
                created.id,
                MeetingRequestPatch {
                    status: Some(MeetingStatus::Scheduled),
                    scheduled_time: Some(datetime("2025-02-20T10:00")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let snapshot = source.export_json().await.unwrap();

        let target = MemoryRequestStore::new();
        target.create(sample_new_request("Stale")).await.unwrap();
        assert_eq!(target.import_json(&snapshot).await.unwrap(), 1);

        let all = target.list(&MeetingRequestFilter::default()).await.unwrap();
        assert_eq!(all, vec![scheduled]);
    }

    #[tokio::test]
    async fn test_import_rejects_inconsistent_snapshot() {
        let store = MemoryRequestStore::new();
        let kept = store.create(sample_new_request("Kept")).await.unwrap();

        let mut broken = MeetingRequest::from_new(sample_new_request("Broken"));
        broken.status = MeetingStatus::Scheduled;
        let json = serde_json::to_string(&vec![broken]).unwrap();

        assert!(matches!(
            store.import_json(&json).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.get(kept.id).await.unwrap(), kept);
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_json() {
        let store = MemoryRequestStore::new();
        assert!(matches!(
            store.import_json("not json").await,
            Err(AppError::Serialization(_))
        ));
    }
}
