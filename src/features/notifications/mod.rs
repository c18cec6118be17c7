pub mod models;
pub mod services;
pub mod store;

pub use services::NotificationService;
pub use store::{MemoryNotificationSink, NotificationSink};
