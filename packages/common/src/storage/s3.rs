use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use ::s3::creds::Credentials;
use ::s3::error::S3Error;
use ::s3::{Bucket, Region};
use tracing::{debug, warn};

use super::error::StorageError;
use super::traits::{
    MAX_LIST_LIMIT, Metadata, ObjectInfo, ObjectMetadata, ObjectPage, ObjectStore, PutOutcome,
};
use crate::validation::is_safe_key;

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            bucket: "fechannel-videos".into(),
            region: "us-east-1".into(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            path_style: false,
        }
    }
}

impl S3Settings {
    /// Whether static credentials were supplied.
    pub fn has_credentials(&self) -> bool {
        self.access_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.secret_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Object store backed by an S3 bucket through `rust-s3`.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    settings: S3Settings,
}

fn backend(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn check_status(key: &str, status: u16) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        other => Err(StorageError::Backend(format!(
            "unexpected status {other} for {key}"
        ))),
    }
}

/// Headers the uploader must send with a presigned PUT. Both are signed.
fn upload_headers(content_type: &str) -> Result<HeaderMap, StorageError> {
    let content_type = HeaderValue::from_str(content_type)
        .map_err(|_| StorageError::Backend(format!("invalid content type {content_type:?}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(
        HeaderName::from_static("x-amz-acl"),
        HeaderValue::from_static("public-read"),
    );
    Ok(headers)
}

fn checked_key(key: &str) -> Result<&str, StorageError> {
    if is_safe_key(key) {
        Ok(key)
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl S3ObjectStore {
    pub fn new(settings: S3Settings) -> Result<Self, StorageError> {
        let credentials = if settings.has_credentials() {
            Credentials::new(
                settings.access_key.as_deref(),
                settings.secret_key.as_deref(),
                None,
                None,
                None,
            )
        } else {
            // Environment, profile or instance metadata.
            Credentials::default()
        }
        .map_err(|e| StorageError::Backend(format!("S3 credentials: {e}")))?;

        let endpoint = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", settings.region));
        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint,
        };

        let mut bucket = Bucket::new(&settings.bucket, region, credentials).map_err(backend)?;
        if settings.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket, settings })
    }

    pub fn settings(&self) -> &S3Settings {
        &self.settings
    }
}

fn parse_listing_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn parse_header_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn backend_name(&self) -> &'static str {
        "s3"
    }

    fn public_url(&self, key: &str) -> String {
        match &self.settings.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.settings.bucket,
                key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.settings.bucket, self.settings.region, key
            ),
        }
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        limit: usize,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage, StorageError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let (result, status) = self
            .bucket
            .list_page(
                prefix.unwrap_or_default().to_string(),
                None,
                continuation_token.map(str::to_string),
                None,
                Some(limit),
            )
            .await
            .map_err(backend)?;
        check_status(prefix.unwrap_or_default(), status)?;

        let objects: Vec<ObjectInfo> = result
            .contents
            .into_iter()
            .map(|object| ObjectInfo {
                size: object.size,
                last_modified: parse_listing_time(&object.last_modified),
                content_type: None,
                url: self.public_url(&object.key),
                key: object.key,
            })
            .collect();

        debug!(count = objects.len(), truncated = result.is_truncated, "Listed S3 objects");

        Ok(ObjectPage {
            key_count: objects.len(),
            objects,
            is_truncated: result.is_truncated,
            next_continuation_token: result.next_continuation_token,
        })
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &Metadata,
    ) -> Result<PutOutcome, StorageError> {
        let key = checked_key(key)?;

        let mut bucket = self.bucket.as_ref().clone();
        bucket.add_header("x-amz-acl", "public-read");
        for (name, value) in metadata {
            bucket.add_header(&format!("x-amz-meta-{name}"), value);
        }

        let response = bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(backend)?;
        check_status(key, response.status_code())?;

        let etag = response
            .headers()
            .get("etag")
            .map(|tag| tag.trim_matches('"').to_string());

        Ok(PutOutcome {
            location: self.public_url(key),
            key: key.to_string(),
            etag,
        })
    }

    async fn head(&self, key: &str) -> Result<ObjectMetadata, StorageError> {
        let key = checked_key(key)?;
        let (head, status) = match self.bucket.head_object(key).await {
            Ok(found) => found,
            Err(S3Error::HttpFailWithBody(404, _)) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(backend(e)),
        };
        check_status(key, status)?;

        Ok(ObjectMetadata {
            content_type: head.content_type,
            content_length: head
                .content_length
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or_default(),
            last_modified: head.last_modified.as_deref().and_then(parse_header_time),
            etag: head.e_tag.map(|tag| tag.trim_matches('"').to_string()),
            metadata: head.metadata.unwrap_or_default().into_iter().collect(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let key = checked_key(key)?;
        let response = self.bucket.delete_object(key).await.map_err(backend)?;
        match check_status(key, response.status_code()) {
            Err(StorageError::NotFound(_)) => {
                warn!(key, "Deleted S3 object did not exist");
                Ok(())
            }
            other => other,
        }
    }

    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_secs: u32,
    ) -> Result<String, StorageError> {
        let key = checked_key(key)?;
        self.bucket
            .presign_put(key, expires_secs, Some(upload_headers(content_type)?), None)
            .await
            .map_err(backend)
    }
}
