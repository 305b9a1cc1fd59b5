use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::record_media;

/// Kind of a media item. Stored as a lowercase string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Photo,
    Video,
}

impl MediaType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(Self::Photo),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }

    /// Extension used when the uploaded filename carries none.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Photo => "webp",
            Self::Video => "mp4",
        }
    }

    /// Content type used when the upload carries none.
    pub fn default_mime(self) -> &'static str {
        match self {
            Self::Photo => "image/webp",
            Self::Video => "video/mp4",
        }
    }

    /// Japanese label used in end-user-facing limit messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "写真",
            Self::Video => "動画",
        }
    }
}

/// Before/after slot of a media item or legacy image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Before,
    After,
}

impl MediaCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// The two representative-reference columns on a treatment record. No other
/// column is writable through the representative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentativeField {
    BeforeMediaId,
    AfterMediaId,
}

impl RepresentativeField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "before_media_id" => Some(Self::BeforeMediaId),
            "after_media_id" => Some(Self::AfterMediaId),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeMediaId => "before_media_id",
            Self::AfterMediaId => "after_media_id",
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    pub record_id: Uuid,
    /// `photo` or `video`.
    #[schema(example = "photo")]
    pub media_type: String,
    pub sort_order: i32,
    /// Opaque object-store locator.
    #[schema(example = "records/0193.../media/0193....webp")]
    pub storage_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<record_media::Model> for MediaResponse {
    fn from(model: record_media::Model) -> Self {
        Self {
            id: model.id,
            record_id: model.record_id,
            media_type: model.media_type,
            sort_order: model.sort_order,
            storage_key: model.storage_key,
            file_size: model.file_size,
            mime_type: model.mime_type,
            created_at: model.created_at,
        }
    }
}
