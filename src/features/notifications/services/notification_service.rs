use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use chrono::NaiveDateTime;
use minijinja::Value;
use uuid::Uuid;

use crate::core::config::NotificationConfig;
use crate::core::error::{AppError, Result};
use crate::features::notifications::models::Notification;
use crate::features::notifications::store::NotificationSink;
use crate::shared::constants::{TEMPLATE_MEETING_RESCHEDULED, TEMPLATE_SUMMARY_REQUESTED};
use crate::shared::templates::TemplateEngine;

/// Emits notifications and serves each user's inbox
pub struct NotificationService {
    sink: Arc<dyn NotificationSink>,
    templates: TemplateEngine,
    date_format: String,
    time_format: String,
}

impl NotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>, config: &NotificationConfig) -> Self {
        let templates = match &config.template_dir {
            Some(dir) => TemplateEngine::with_override_dir(config.locale.clone(), dir),
            None => TemplateEngine::new(config.locale.clone()),
        };
        tracing::debug!(
            "Notification templates ready for locale '{}'",
            templates.locale()
        );

        Self {
            sink,
            templates,
            date_format: config.date_format.clone(),
            time_format: config.time_format.clone(),
        }
    }

    /// Append an unread notification for `user_id`.
    ///
    /// Delivered at most once; there is no retry.
    pub async fn emit(&self, user_id: &str, message: impl Into<String>) -> Result<Notification> {
        let notification = Notification::new(user_id, message);
        self.sink.append(notification.clone()).await?;

        tracing::info!(
            "Notification emitted: id={}, user={}",
            notification.id,
            user_id
        );
        Ok(notification)
    }

    /// Message telling a requester their meeting moved to `scheduled_time`.
    pub fn render_rescheduled(&self, title: &str, scheduled_time: NaiveDateTime) -> Result<String> {
        let mut ctx: HashMap<&str, Value> = HashMap::new();
        ctx.insert("title", Value::from(title));
        ctx.insert(
            "date",
            Value::from(format_datetime(scheduled_time, &self.date_format)?),
        );
        ctx.insert(
            "time",
            Value::from(format_datetime(scheduled_time, &self.time_format)?),
        );

        Ok(self.templates.render(TEMPLATE_MEETING_RESCHEDULED, &ctx)?)
    }

    /// Message asking a requester to upload the summary of a held meeting.
    pub fn render_summary_requested(
        &self,
        title: &str,
        held_at: Option<NaiveDateTime>,
    ) -> Result<String> {
        let mut ctx: HashMap<&str, Value> = HashMap::new();
        ctx.insert("title", Value::from(title));
        if let Some(held_at) = held_at {
            ctx.insert(
                "date",
                Value::from(format_datetime(held_at, &self.date_format)?),
            );
        }

        Ok(self.templates.render(TEMPLATE_SUMMARY_REQUESTED, &ctx)?)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.sink.list_for_user(user_id).await
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        Ok(self
            .sink
            .list_for_user(user_id)
            .await?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification> {
        self.sink.mark_read(id).await
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let changed = self.sink.mark_all_read(user_id).await?;
        tracing::debug!("Marked {} notifications read for user {}", changed, user_id);
        Ok(changed)
    }
}

/// Format `value` with a chrono format string, failing instead of panicking on a bad format.
fn format_datetime(value: NaiveDateTime, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format)).map_err(|_| {
        tracing::error!("Invalid date/time display format: {}", format);
        AppError::Validation(format!("'{}' is not a valid date/time format", format))
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::store::MemoryNotificationSink;
    use crate::shared::test_helpers::datetime;

    fn service() -> NotificationService {
        NotificationService::new(
            Arc::new(MemoryNotificationSink::new()),
            &NotificationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_emit_appends_unread() {
        let service = service();
        let notification = service.emit("alice", "hello").await.unwrap();

        assert!(!notification.read);
        assert_eq!(notification.user_id, "alice");
        assert_eq!(service.list_for_user("alice").await.unwrap(), vec![notification]);
        assert_eq!(service.unread_count("alice").await.unwrap(), 1);
        assert_eq!(service.unread_count("bob").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_updates_unread_count() {
        let service = service();
        let first = service.emit("alice", "one").await.unwrap();
        service.emit("alice", "two").await.unwrap();

        service.mark_read(first.id).await.unwrap();
        assert_eq!(service.unread_count("alice").await.unwrap(), 1);

        assert_eq!(service.mark_all_read("alice").await.unwrap(), 1);
        assert_eq!(service.unread_count("alice").await.unwrap(), 0);
    }

    #[test]
    fn test_render_rescheduled_uses_configured_formats() {
        let config = NotificationConfig {
            date_format: "%d/%m/%Y".to_string(),
            time_format: "%I:%M %p".to_string(),
            ..Default::default()
        };
        let service = NotificationService::new(Arc::new(MemoryNotificationSink::new()), &config);

        let message = service
            .render_rescheduled("Budget Review", datetime("2025-02-21T14:30"))
            .unwrap();
        assert_eq!(
            message,
            "Your meeting request \"Budget Review\" has been rescheduled to 21/02/2025 at 02:30 PM."
        );
    }

    #[test]
    fn test_invalid_display_format_is_an_error() {
        let config = NotificationConfig {
            time_format: "%Q".to_string(),
            ..Default::default()
        };
        let service = NotificationService::new(Arc::new(MemoryNotificationSink::new()), &config);

        let result = service.render_rescheduled("Budget Review", datetime("2025-02-21T14:30"));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let config = NotificationConfig {
            date_format: "%Q".to_string(),
            ..Default::default()
        };
        let service = NotificationService::new(Arc::new(MemoryNotificationSink::new()), &config);
        let result =
            service.render_summary_requested("Budget Review", Some(datetime("2025-02-20T10:00")));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_render_summary_requested() {
        let service = service();
        let message = service
            .render_summary_requested("Budget Review", Some(datetime("2025-02-20T10:00")))
            .unwrap();
        assert_eq!(
            message,
            "Please upload the meeting summary for \"Budget Review\" (held on 2025-02-20)."
        );

        let message = service.render_summary_requested("Budget Review", None).unwrap();
        assert_eq!(message, "Please upload the meeting summary for \"Budget Review\".");
    }
}
