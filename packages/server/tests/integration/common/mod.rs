use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use ::common::storage::{FilesystemObjectStore, ObjectStore};
use server::config::{
    AppConfig, AuthConfig, CatalogConfig, CorsConfig, FilesystemStorageConfig, RokuConfig,
    S3Config, ServerConfig, StorageBackend, StorageConfig,
};
use server::repository::CatalogRepository;
use server::state::AppState;


pub use store::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@fechannel.com";
pub const ADMIN_PASSWORD: &str = "test-admin-password";
pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const HEALTH: &str = "/api/v1/health";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";

    pub const VIDEOS: &str = "/api/v1/videos";
    pub const FEATURED: &str = "/api/v1/videos/featured";
    pub const SEO: &str = "/api/v1/videos/seo";

    pub fn video(id: &str) -> String {
        format!("/api/v1/videos/{id}")
    }

    pub fn related(id: &str) -> String {
        format!("/api/v1/videos/{id}/related")
    }

    pub fn views(id: &str) -> String {
        format!("/api/v1/videos/{id}/views")
    }

    pub fn playback(id: &str) -> String {
        format!("/api/v1/videos/{id}/playback")
    }

    pub const CATEGORIES: &str = "/api/v1/categories";

    pub fn category(id: &str) -> String {
        format!("/api/v1/categories/{id}")
    }

    pub fn category_videos(id: &str) -> String {
        format!("/api/v1/categories/{id}/videos")
    }

    pub const SEARCH: &str = "/api/v1/search";
    pub const ADMIN_STATS: &str = "/api/v1/admin/stats";
    pub const ANALYTICS: &str = "/api/v1/analytics";

    pub const OBJECTS: &str = "/api/v1/storage/objects";
    pub const OBJECT_METADATA: &str = "/api/v1/storage/objects/metadata";
    pub const UPLOAD_URL: &str = "/api/v1/storage/upload-url";

    pub const ROKU_FEED: &str = "/api/v1/roku/feed";
    pub const ROKU_FEEDS: &str = "/api/v1/roku/feeds";
    pub const ROKU_FEED_URLS: &str = "/api/v1/roku/feeds/urls";
    pub const ROKU_PUBLISH: &str = "/api/v1/roku/feeds/publish";
    pub const ROKU_REMOTE: &str = "/api/v1/roku/remote";
    pub const ROKU_VALIDATE: &str = "/api/v1/roku/validate";
    pub const ROKU_UPLOAD: &str = "/api/v1/roku/upload";

    pub fn roku_channel(channel: &str) -> String {
        format!("/api/v1/roku/feeds/{channel}")
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    /// Catalog directory; removed when the app is dropped.
    pub data_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Seed catalog shipped with the server.
fn seed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn copy_seed(into: &Path) {
    for file in ["videos.json", "categories.json"] {
        std::fs::copy(seed_dir().join(file), into.join(file))
            .unwrap_or_else(|e| panic!("Failed to copy seed {file}: {e}"));
    }
}

pub fn test_config(data_dir: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            token_ttl_hours: 24,
        },
        catalog: CatalogConfig {
            data_dir: data_dir.to_path_buf(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Filesystem,
            presign_expiry_secs: 900,
            max_upload_size: 1024 * 1024,
            s3: S3Config::default(),
            filesystem: FilesystemStorageConfig::default(),
        },
        roku: RokuConfig {
            // Nothing listens here unless a test overrides it.
            remote_feed_url: "http://127.0.0.1:9/roku-feed.json".to_string(),
            ..RokuConfig::default()
        },
    }
}

async fn bind() -> tokio::net::TcpListener {
    tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port")
}

async fn serve(
    listener: tokio::net::TcpListener,
    config: AppConfig,
    storage: Arc<dyn ObjectStore>,
) -> SocketAddr {
    let catalog = CatalogRepository::load(&config.catalog.data_dir)
        .await
        .expect("Failed to load seed catalog");
    let state = AppState::new(config, catalog, storage).expect("Failed to build app state");
    let app = server::build_router(state);
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with the seed catalog and a config adjusted by `configure`.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let data_dir = TempDir::new().expect("Failed to create catalog dir");
        copy_seed(data_dir.path());

        let mut config = test_config(data_dir.path());
        configure(&mut config);

        let listener = bind().await;
        let store = Arc::new(MemoryStore::default());
        let addr = serve(listener, config, store.clone()).await;

        Self {
            addr,
            client: Client::new(),
            store,
            data_dir,
        }
    }

    /// Spawn against the filesystem backend rooted in `objects`, with public
    /// URLs pointing back at this server's `/media` route. `store` stays empty.
    pub async fn spawn_on_disk(objects: &Path) -> Self {
        let data_dir = TempDir::new().expect("Failed to create catalog dir");
        copy_seed(data_dir.path());

        let listener = bind().await;
        let addr = listener.local_addr().unwrap();

        let mut config = test_config(data_dir.path());
        config.storage.filesystem = FilesystemStorageConfig {
            root: objects.to_path_buf(),
            public_base_url: format!("http://{addr}/media"),
        };
        let fs = &config.storage.filesystem;
        let disk = FilesystemObjectStore::new(
            fs.root.clone(),
            fs.public_base_url.clone(),
            config.storage.max_upload_size,
        )
        .await
        .expect("Failed to open filesystem storage");
        serve(listener, config, Arc::new(disk)).await;

        Self {
            addr,
            client: Client::new(),
            store: Arc::new(MemoryStore::default()),
            data_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Log in as the configured admin and return the bearer token.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({
                    "email": ADMIN_EMAIL,
                    "password": ADMIN_PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.data()["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a video via the API and return its `id`.
    pub async fn create_video(&self, token: &str, title: &str, category_id: &str) -> String {
        let res = self
            .post_with_token(
                routes::VIDEOS,
                &serde_json::json!({
                    "title": title,
                    "description": "A test upload.",
                    "video_url": "https://cdn.example.com/videos/test.mp4",
                    "category_id": category_id,
                    "duration": 600,
                    "tags": ["test"],
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_video failed: {}", res.text);
        res.id()
    }

    /// The catalog file as currently written to disk.
    pub fn videos_on_disk(&self) -> Value {
        let raw = std::fs::read_to_string(self.data_dir.path().join("videos.json"))
            .expect("videos.json should exist");
        serde_json::from_str(&raw).expect("videos.json should be valid JSON")
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        assert_eq!(
            self.body["success"], true,
            "expected a success envelope: {}",
            self.text
        );
        &self.body["data"]
    }

    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("response data should contain 'id'")
            .to_string()
    }

    /// Assert an error envelope with the given status and code.
    pub fn assert_error(&self, status: u16, code: &str) {
        assert_eq!(self.status, status, "unexpected status: {}", self.text);
        assert_eq!(self.body["success"], false, "{}", self.text);
        assert_eq!(self.body["code"], code, "{}", self.text);
    }
}
