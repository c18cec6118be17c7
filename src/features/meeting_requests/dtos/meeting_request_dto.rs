use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::meeting_requests::models::{Document, MeetingStatus};
use crate::shared::types::{PaginationQuery, SortDirection};

// =============================================================================
// REQUESTER DTOs
// =============================================================================

/// Form input for submitting a new meeting request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequestDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    /// Date (`2025-03-01`) or date and time by which the meeting should occur
    #[validate(length(min = 1, message = "deadline is required"))]
    pub deadline: String,

    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Changes a requester may make while the request is still pending
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeetingRequestDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    pub deadline: Option<String>,

    /// Replaces the attached documents when present
    pub documents: Option<Vec<Document>>,
}

// =============================================================================
// ADMIN DTOs
// =============================================================================

/// Approve a pending request and set the meeting time
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveMeetingRequestDto {
    /// Required; kept optional so a missing value surfaces as a validation error
    pub scheduled_time: Option<String>,

    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectMeetingRequestDto {
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleMeetingRequestDto {
    pub scheduled_time: Option<String>,

    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub admin_notes: Option<String>,
}

/// Replace (or clear, with `None`) the administrator notes
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminNotesDto {
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub admin_notes: Option<String>,
}

// =============================================================================
// LISTING
// =============================================================================

/// Field used to order request listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingRequestSortField {
    #[default]
    CreatedAt,
    Deadline,
    ScheduledTime,
}

/// Query params for listing meeting requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequestQueryParams {
    /// Filter by status
    pub status: Option<MeetingStatus>,

    /// Only requests submitted by this user
    pub requester_id: Option<String>,

    /// Case-insensitive search in title or description
    pub search: Option<String>,

    #[serde(default)]
    pub sort_by: MeetingRequestSortField,

    /// Sort direction (default: desc)
    #[serde(default)]
    pub sort: SortDirection,

    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,

    /// Items per page (default: configured page size, max: 100)
    pub page_size: Option<i64>,
}

impl MeetingRequestQueryParams {
    pub fn pagination(&self, default_page_size: i64) -> PaginationQuery {
        PaginationQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
        }
    }
}
