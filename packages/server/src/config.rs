use std::path::PathBuf;

use common::storage::s3::S3Settings;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

fn default_cors_max_age() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_admin_email() -> String {
    "admin@fechannel.com".into()
}

fn default_admin_password() -> String {
    "FEChannel2024!".into()
}

fn default_token_ttl_hours() -> i64 {
    24
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Directory holding `videos.json` and `categories.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Filesystem,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            path_style: false,
        }
    }
}

fn default_bucket() -> String {
    "fechannel-videos".into()
}

fn default_region() -> String {
    "us-east-1".into()
}

impl From<&S3Config> for S3Settings {
    fn from(config: &S3Config) -> Self {
        Self {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            path_style: config.path_style,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data/objects")
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:3000/media".into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u32,
    /// Largest object accepted through the API, in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    #[serde(default)]
    pub s3: S3Config,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
}

fn default_presign_expiry_secs() -> u32 {
    3600
}

fn default_max_upload_size() -> u64 {
    // 50 MiB through the JSON API; larger files go through presigned uploads.
    50 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct RokuConfig {
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Public site origin, used to make relative thumbnails absolute.
    #[serde(default = "default_site_origin")]
    pub site_origin: String,
    #[serde(default = "default_remote_feed_url")]
    pub remote_feed_url: String,
    /// Object key the validated feed is uploaded to.
    #[serde(default = "default_feed_key")]
    pub feed_key: String,
}

impl Default for RokuConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            language: default_language(),
            site_origin: default_site_origin(),
            remote_feed_url: default_remote_feed_url(),
            feed_key: default_feed_key(),
        }
    }
}

fn default_provider_name() -> String {
    "Flat Earth TV Channel".into()
}

fn default_language() -> String {
    "en-us".into()
}

fn default_site_origin() -> String {
    "https://fechannel.com".into()
}

fn default_remote_feed_url() -> String {
    "https://fechannel.com/roku-feed.json".into()
}

fn default_feed_key() -> String {
    "roku-feed.json".into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub roku: RokuConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("FECHANNEL_CONFIG").unwrap_or_else(|_| "config/config".into());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("storage.backend", "filesystem")?
            // Load from config/config.toml
            .add_source(File::with_name(&path).required(false))
            // Override from environment (e.g., FECHANNEL__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("FECHANNEL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
