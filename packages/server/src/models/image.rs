use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageUploadResponse {
    /// Storage key of the uploaded legacy image.
    #[schema(example = "records/0193.../before.webp")]
    pub key: String,
}
