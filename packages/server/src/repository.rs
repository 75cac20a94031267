//! File-backed catalog shared by all handlers.
//!
//! The catalog lives in memory behind an async `RwLock`. Every mutation is
//! applied to a copy, written to `videos.json` through a temporary file and a
//! rename, and only then swapped in, so readers never observe a change that
//! failed to persist.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::catalog::{CategoriesDocument, VideosDocument};
use common::{Catalog, CatalogError};
use thiserror::Error;
use tokio::fs;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

pub const VIDEOS_FILE: &str = "videos.json";
pub const CATEGORIES_FILE: &str = "categories.json";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct CatalogRepository {
    inner: Arc<RwLock<Catalog>>,
    data_dir: PathBuf,
}

async fn read_optional(path: &Path) -> Result<Option<String>, RepositoryError> {
    match fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse<T: serde::de::DeserializeOwned + Default>(
    raw: Option<String>,
) -> Result<T, CatalogError> {
    match raw {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

impl CatalogRepository {
    /// Load both documents from `data_dir`. Missing files yield an empty catalog.
    pub async fn load(data_dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let data_dir = data_dir.into();
        let videos: VideosDocument = parse(read_optional(&data_dir.join(VIDEOS_FILE)).await?)?;
        let categories: CategoriesDocument =
            parse(read_optional(&data_dir.join(CATEGORIES_FILE)).await?)?;

        info!(
            dir = %data_dir.display(),
            videos = videos.videos.len(),
            categories = categories.categories.len(),
            commercials = videos.commercials.len(),
            "Catalog loaded"
        );

        Ok(Self::from_catalog(
            Catalog::from_documents(videos, categories),
            data_dir,
        ))
    }

    pub fn from_catalog(catalog: Catalog, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
            data_dir: data_dir.into(),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner.read().await
    }

    /// Apply `f` and persist the result. On any error the catalog is unchanged.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Catalog) -> Result<T, CatalogError>,
    {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next.videos_document()).await?;
        *guard = next;
        Ok(out)
    }

    async fn persist(&self, document: &VideosDocument) -> Result<(), RepositoryError> {
        let target = self.data_dir.join(VIDEOS_FILE);
        let tmp = self.data_dir.join(format!(".{VIDEOS_FILE}.tmp"));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| RepositoryError::Io { path, source }
        };

        let bytes = serde_json::to_vec_pretty(document)?;
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(io_err(&self.data_dir))?;
        fs::write(&tmp, bytes).await.map_err(io_err(&tmp))?;
        fs::rename(&tmp, &target).await.map_err(io_err(&target))?;

        debug!(path = %target.display(), videos = document.videos.len(), "Catalog persisted");
        Ok(())
    }
}
