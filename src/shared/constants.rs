/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// NOTIFICATION TEMPLATES
// =============================================================================

/// Sent to the requester when an administrator moves a scheduled meeting
pub const TEMPLATE_MEETING_RESCHEDULED: &str = "meeting_rescheduled";

/// Sent to the requester when an administrator asks for the meeting summary
pub const TEMPLATE_SUMMARY_REQUESTED: &str = "summary_requested";
