use std::net::SocketAddr;
use std::sync::Arc;

// Leading `::` picks the storage crate over this test module's own name.
use ::common::storage::filesystem::FilesystemObjectStore;
use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig};
use server::state::AppState;

/// Ceilings used by every test server. Small enough that the limit tests
/// stay cheap.
pub const MAX_PHOTO_SIZE: u64 = 1024 * 1024;
pub const MAX_VIDEO_SIZE: u64 = 2 * 1024 * 1024;
pub const MAX_PHOTOS_PER_RECORD: u64 = 5;
pub const MAX_VIDEOS_PER_RECORD: u64 = 2;

pub mod routes {
    pub const HEALTH: &str = "/api/health";
    pub const CUSTOMERS: &str = "/api/customers";
    pub const RECORDS: &str = "/api/records";
    pub const MEDIA_UPLOAD: &str = "/api/media/upload";
    pub const IMAGES_UPLOAD: &str = "/api/images/upload";

    pub fn customer(id: &str) -> String {
        format!("/api/customers/{id}")
    }

    pub fn records_for(customer_id: &str) -> String {
        format!("/api/records?customer_id={customer_id}")
    }

    pub fn record(id: &str) -> String {
        format!("/api/records/{id}")
    }

    pub fn media_list(record_id: &str) -> String {
        format!("/api/media/{record_id}")
    }

    pub fn representative(record_id: &str) -> String {
        format!("/api/media/{record_id}/representative")
    }

    pub fn media_delete(id: &str) -> String {
        format!("/api/media/{id}/delete")
    }

    pub fn image(key: &str) -> String {
        format!("/api/images/{key}")
    }
}

/// A running test server backed by a throwaway SQLite file and an object
/// store rooted in the same temp directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = dir.path().join("test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let storage_root = dir.path().join("storage");
        let store = FilesystemObjectStore::new(storage_root.clone())
            .await
            .expect("Failed to initialize object store");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url.clone(),
            },
            storage: StorageConfig {
                root: storage_root.display().to_string(),
                max_photo_size: MAX_PHOTO_SIZE,
                max_video_size: MAX_VIDEO_SIZE,
                max_photos_per_record: MAX_PHOTOS_PER_RECORD,
                max_videos_per_record: MAX_VIDEOS_PER_RECORD,
            },
        };

        let state = AppState {
            db: db.clone(),
            store: Arc::new(store),
            config,
        };
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning the raw bytes and the content-type and cache-control
    /// headers, for blob endpoints.
    pub async fn get_bytes(&self, path: &str) -> (u16, Vec<u8>, String, String) {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        let status = res.status().as_u16();
        let header = |name: &str| {
            res.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let content_type = header("content-type");
        let cache_control = header("cache-control");
        let bytes = res.bytes().await.expect("Failed to read body").to_vec();
        (status, bytes, content_type, cache_control)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn upload_media(
        &self,
        record_id: &str,
        media_type: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new()
            .text("record_id", record_id.to_string())
            .text("media_type", media_type.to_string())
            .part("file", part);

        self.post_multipart(routes::MEDIA_UPLOAD, form).await
    }

    pub async fn upload_image(
        &self,
        record_id: &str,
        slot: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new()
            .text("record_id", record_id.to_string())
            .text("type", slot.to_string())
            .part("file", part);

        self.post_multipart(routes::IMAGES_UPLOAD, form).await
    }

    /// Create a customer via the API and return its id.
    pub async fn create_customer(&self, name: &str, name_kana: &str) -> String {
        let res = self
            .post(
                routes::CUSTOMERS,
                &serde_json::json!({ "name": name, "name_kana": name_kana }),
            )
            .await;
        assert_eq!(res.status, 201, "create_customer failed: {}", res.text);
        res.id()
    }

    /// Create a treatment record via the API and return its id.
    pub async fn create_record(&self, customer_id: &str, treatment_date: &str) -> String {
        let res = self
            .post(
                routes::RECORDS,
                &serde_json::json!({
                    "customer_id": customer_id,
                    "treatment_date": treatment_date,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_record failed: {}", res.text);
        res.id()
    }

    /// Upload a small photo to a record and return the media id.
    pub async fn upload_photo(&self, record_id: &str, file_name: &str) -> String {
        let res = self
            .upload_media(record_id, "photo", file_name, b"img".to_vec(), "image/webp")
            .await;
        assert_eq!(res.status, 201, "upload_photo failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// The `data` payload of the response envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` message of the response envelope.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("response data should contain 'id'")
            .to_string()
    }
}
