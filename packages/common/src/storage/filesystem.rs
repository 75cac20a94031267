use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use super::error::StorageError;
use super::traits::{
    MAX_LIST_LIMIT, Metadata, ObjectInfo, ObjectMetadata, ObjectPage, ObjectStore, PutOutcome,
};
use crate::validation::{content_type_for_key, is_safe_key};

const TMP_DIR: &str = ".tmp";
const META_DIR: &str = ".meta";

/// Sidecar stored next to each object under `.meta/`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Sidecar {
    content_type: Option<String>,
    etag: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

/// Local-disk object store for development.
///
/// Objects live at `{root}/{key}`; their content type, etag and user metadata
/// live in `{root}/.meta/{key}.json`. The server's media route exposes
/// objects at `{public_base_url}/{key}`.
pub struct FilesystemObjectStore {
    root: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    pub async fn new(
        root: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(root.join(TMP_DIR)).await?;
        fs::create_dir_all(root.join(META_DIR)).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let reserved = key
            .split('/')
            .any(|segment| segment.is_empty() || segment.starts_with('.'));
        if !is_safe_key(key) || reserved {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn sidecar_path(&self, key: &str) -> PathBuf {
        self.root.join(META_DIR).join(format!("{key}.json"))
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(TMP_DIR)
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Write `data` to `target` through a temp file so readers never see a partial object.
    async fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn read_sidecar(&self, key: &str) -> Result<Sidecar, StorageError> {
        match fs::read(self.sidecar_path(key)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Sidecar::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Every object key under the root, sorted.
    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                if name.to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                } else if let Ok(relative) = path.strip_prefix(&self.root) {
                    keys.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn modified_at(meta: &std::fs::Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        limit: usize,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage, StorageError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let prefix = prefix.unwrap_or_default();

        let mut matching = self
            .all_keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .filter(|key| continuation_token.is_none_or(|after| key.as_str() > after))
            .peekable();

        let mut objects = Vec::new();
        while objects.len() < limit {
            let Some(key) = matching.next() else { break };
            let meta = fs::metadata(self.root.join(&key)).await?;
            let sidecar = self.read_sidecar(&key).await?;
            objects.push(ObjectInfo {
                size: meta.len(),
                last_modified: modified_at(&meta),
                content_type: sidecar
                    .content_type
                    .or_else(|| Some(content_type_for_key(&key))),
                url: self.public_url(&key),
                key,
            });
        }

        let is_truncated = matching.peek().is_some();
        let next_continuation_token = if is_truncated {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };

        Ok(ObjectPage {
            key_count: objects.len(),
            objects,
            is_truncated,
            next_continuation_token,
        })
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &Metadata,
    ) -> Result<PutOutcome, StorageError> {
        let path = self.object_path(key)?;
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let etag = hex::encode(Sha256::digest(&data));
        self.write_atomic(&path, &data).await?;

        let sidecar = Sidecar {
            content_type: Some(content_type.to_string()),
            etag: Some(etag.clone()),
            metadata: metadata.clone(),
        };
        self.write_atomic(&self.sidecar_path(key), &serde_json::to_vec_pretty(&sidecar)?)
            .await?;

        Ok(PutOutcome {
            location: self.public_url(key),
            key: key.to_string(),
            etag: Some(etag),
        })
    }

    async fn head(&self, key: &str) -> Result<ObjectMetadata, StorageError> {
        let path = self.object_path(key)?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let sidecar = self.read_sidecar(key).await?;

        Ok(ObjectMetadata {
            content_type: sidecar.content_type.or_else(|| Some(content_type_for_key(key))),
            content_length: meta.len(),
            last_modified: modified_at(&meta),
            etag: sidecar.etag,
            metadata: sidecar.metadata,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        for target in [path, self.sidecar_path(key)] {
            match fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn presign_upload(
        &self,
        _key: &str,
        _content_type: &str,
        _expires_secs: u32,
    ) -> Result<String, StorageError> {
        Err(StorageError::Unsupported("presigned uploads"))
    }
}
