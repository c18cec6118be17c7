use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::NotificationSink;
use crate::core::error::{AppError, Result};
use crate::features::notifications::models::Notification;

#[derive(Default)]
pub struct MemoryNotificationSink {
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationSink for MemoryNotificationSink {
    async fn append(&self, notification: Notification) -> Result<()> {
        self.notifications.write().await.push(notification);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        // Appended in creation order, so reversing gives newest first
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Notification '{}' not found", id)))?;
        notification.read = true;
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let mut notifications = self.notifications.write().await;
        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_is_per_user_newest_first() {
        let sink = MemoryNotificationSink::new();
        sink.append(Notification::new("alice", "first")).await.unwrap();
        sink.append(Notification::new("bob", "other")).await.unwrap();
        sink.append(Notification::new("alice", "second")).await.unwrap();

        let inbox = sink.list_for_user("alice").await.unwrap();
        let messages: Vec<&str> = inbox.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert!(inbox.iter().all(|n| !n.read));
    }

    #[tokio::test]
    async fn test_mark_read() {
        let sink = MemoryNotificationSink::new();
        let notification = Notification::new("alice", "hello");
        let id = notification.id;
        sink.append(notification).await.unwrap();

        assert!(sink.mark_read(id).await.unwrap().read);
        assert!(sink.list_for_user("alice").await.unwrap()[0].read);
        assert!(matches!(
            sink.mark_read(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_all_read_only_touches_user() {
        let sink = MemoryNotificationSink::new();
        sink.append(Notification::new("alice", "a")).await.unwrap();
        sink.append(Notification::new("alice", "b")).await.unwrap();
        sink.append(Notification::new("bob", "c")).await.unwrap();

        assert_eq!(sink.mark_all_read("alice").await.unwrap(), 2);
        assert_eq!(sink.mark_all_read("alice").await.unwrap(), 0);
        assert!(!sink.list_for_user("bob").await.unwrap()[0].read);
    }
}
