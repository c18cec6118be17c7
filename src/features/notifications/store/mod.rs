mod memory;

pub use memory::MemoryNotificationSink;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::notifications::models::Notification;

/// Append-only notification collection keyed by recipient
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn append(&self, notification: Notification) -> Result<()>;

    /// Notifications for `user_id`, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>>;

    /// Flag one notification as read, or `AppError::NotFound`.
    async fn mark_read(&self, id: Uuid) -> Result<Notification>;

    /// Flag every notification for `user_id` as read, returning how many changed.
    async fn mark_all_read(&self, user_id: &str) -> Result<usize>;
}
