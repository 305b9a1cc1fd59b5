use axum::Json;
use serde::Serialize;
use uuid::Uuid;

/// Uniform success/failure envelope used by every endpoint:
/// `{success, data?, error?}`.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload in a success envelope.
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// Payload for delete responses: the id of the removed resource.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
