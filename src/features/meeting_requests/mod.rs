pub mod dtos;
pub mod models;
pub mod services;
pub mod store;

pub use services::MeetingRequestService;
pub use store::{MemoryRequestStore, RequestStore};
