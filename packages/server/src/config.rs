use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty list means any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the filesystem object store.
    pub root: String,
    /// Per-file size ceilings in bytes.
    pub max_photo_size: u64,
    pub max_video_size: u64,
    /// Per-record count ceilings, enforced per media type.
    pub max_photos_per_record: u64,
    pub max_videos_per_record: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://karte.db?mode=rwc")?
            .set_default("storage.root", "./storage")?
            .set_default("storage.max_photo_size", 10u64 * 1024 * 1024)?
            .set_default("storage.max_video_size", 100u64 * 1024 * 1024)?
            .set_default("storage.max_photos_per_record", 5u64)?
            .set_default("storage.max_videos_per_record", 5u64)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., KARTE__DATABASE__URL)
            .add_source(Environment::with_prefix("KARTE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
