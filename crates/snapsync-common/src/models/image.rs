//! Image model: raw image bytes attached to an event and an uploader.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::pagination::PageQuery;

/// Fallback shown when the image's event was deleted.
pub const UNKNOWN_EVENT: &str = "Unknown Event";
/// Fallback shown when the image's uploader was deleted.
pub const UNKNOWN_CREATOR: &str = "Unknown";

/// Listing row: an image joined with its event name and uploader.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageRow {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub image_data: Vec<u8>,
    pub event_name: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Dashboard table entry. The image itself is inlined as a data URI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub event_name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<ImageRow> for ImageResponse {
    fn from(row: ImageRow) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&row.image_data);
        Self {
            id: row.id,
            name: row.name,
            image_url: format!("data:{};base64,{encoded}", row.content_type),
            event_name: row.event_name.unwrap_or_else(|| UNKNOWN_EVENT.into()),
            created_by: row.created_by.unwrap_or_else(|| UNKNOWN_CREATOR.into()),
            created_at: row.created_at,
        }
    }
}

/// Image metadata without the bytes. Returned by upload and rename.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageSummary {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    /// Size in bytes.
    pub size: i32,
    pub event_id: Option<Uuid>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored bytes for `GET /api/images/{id}/content`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageContent {
    pub content_type: String,
    pub image_data: Vec<u8>,
}

/// A decoded file part from the upload form.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// `GET /api/images` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ImageListQuery {
    /// Case-insensitive match against the image name or its event name.
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ImageListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// The search term, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// `PATCH /api/images`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RenameImageRequest {
    pub id: Option<Uuid>,

    #[validate(length(max = 255, message = "Image name must be at most 255 characters"))]
    pub name: Option<String>,
}

/// `DELETE /api/images`
#[derive(Debug, Default, Deserialize)]
pub struct DeleteImageRequest {
    pub id: Option<Uuid>,
}
