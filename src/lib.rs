//! Meeting request lifecycle management.
//!
//! Employees submit meeting requests; administrators approve and schedule,
//! reject, reschedule and close them out with a summary document. The crate
//! holds the lifecycle rules, an advisory double-booking check and the
//! notification inbox. Presentation is left to the embedding UI.

pub mod core;
pub mod features;
pub mod shared;

pub use crate::core::config::Config;
pub use crate::core::error::{AppError, Result};
pub use crate::features::meeting_requests::{
    MeetingRequestService, MemoryRequestStore, RequestStore,
};
pub use crate::features::notifications::{MemoryNotificationSink, NotificationService};
