use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::storage::s3::S3ObjectStore;
use common::storage::{FilesystemObjectStore, ObjectStore};
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::repository::CatalogRepository;
use crate::utils::hash;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: CatalogRepository,
    pub storage: Arc<dyn ObjectStore>,
    /// PHC hash of the configured admin password.
    pub admin_password_hash: Arc<str>,
    /// Outbound client for remote feed fetches.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        catalog: CatalogRepository,
        storage: Arc<dyn ObjectStore>,
    ) -> anyhow::Result<Self> {
        let admin_password_hash = hash::hash_password(&config.auth.admin_password)
            .map_err(|e| anyhow::anyhow!("hashing admin password: {e}"))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("fechannel/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            catalog,
            storage,
            admin_password_hash: admin_password_hash.into(),
            http,
        })
    }

    /// Build state from configuration: load the catalog and open the storage backend.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = CatalogRepository::load(&config.catalog.data_dir)
            .await
            .context("loading catalog")?;
        let storage = open_storage(&config).await?;
        Self::new(config, catalog, storage)
    }
}

async fn open_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    let store: Arc<dyn ObjectStore> = match storage.backend {
        StorageBackend::S3 => {
            let store = S3ObjectStore::new((&storage.s3).into()).context("opening S3 bucket")?;
            info!(bucket = %storage.s3.bucket, region = %storage.s3.region, "Using S3 storage");
            Arc::new(store)
        }
        StorageBackend::Filesystem => {
            let fs = &storage.filesystem;
            let store = FilesystemObjectStore::new(
                fs.root.clone(),
                fs.public_base_url.clone(),
                storage.max_upload_size,
            )
            .await
            .context("opening filesystem storage")?;
            info!(root = %fs.root.display(), "Using filesystem storage");
            Arc::new(store)
        }
    };
    Ok(store)
}
