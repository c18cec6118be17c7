use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::shared::validation::MIME_TYPE_REGEX;

/// A file attached to a meeting request, or the summary closing it out.
///
/// `url` is an opaque handle supplied by whatever performed the upload; this
/// crate never dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Document name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Document url is required"))]
    pub url: String,

    #[serde(rename = "type")]
    #[validate(regex(path = *MIME_TYPE_REGEX, message = "Document type must be a MIME type"))]
    pub content_type: String,

    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Build a document reference for a freshly selected file.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            content_type: content_type.into(),
            uploaded_at: Utc::now(),
        }
    }
}
