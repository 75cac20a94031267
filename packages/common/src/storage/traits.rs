use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// User metadata attached to an object (`x-amz-meta-*` on S3).
pub type Metadata = BTreeMap<String, String>;

/// Largest page a single list call returns.
pub const MAX_LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    /// Public URL of the object.
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ObjectPage {
    pub objects: Vec<ObjectInfo>,
    pub key_count: usize,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ObjectMetadata {
    pub content_type: Option<String>,
    pub content_length: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PutOutcome {
    /// Public URL of the stored object.
    pub location: String,
    pub key: String,
    pub etag: Option<String>,
}

/// Key-addressed object storage.
///
/// Objects written through this trait are publicly readable at
/// [`ObjectStore::public_url`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name reported by the health check.
    fn backend_name(&self) -> &'static str;

    fn public_url(&self, key: &str) -> String;

    /// List up to `limit` objects under `prefix`, in key order.
    async fn list(
        &self,
        prefix: Option<&str>,
        limit: usize,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage, StorageError>;

    /// Walk every page under `prefix`.
    async fn list_all(&self, prefix: Option<&str>) -> Result<Vec<ObjectInfo>, StorageError> {
        let mut objects = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.list(prefix, MAX_LIST_LIMIT, token.as_deref()).await?;
            objects.extend(page.objects);
            match page.next_continuation_token {
                Some(next) if page.is_truncated => token = Some(next),
                _ => return Ok(objects),
            }
        }
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &Metadata,
    ) -> Result<PutOutcome, StorageError>;

    async fn head(&self, key: &str) -> Result<ObjectMetadata, StorageError>;

    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// A URL that lets a client `PUT` the object directly for `expires_secs`.
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_secs: u32,
    ) -> Result<String, StorageError>;
}
