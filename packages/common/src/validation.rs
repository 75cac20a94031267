//! URL, key and upload checks shared by the catalog and storage handlers.

use thiserror::Error;

/// Extensions accepted for catalog video URLs.
pub const VIDEO_URL_EXTENSIONS: &[&str] = &[".mp4", ".m4v", ".mov", ".avi", ".webm"];

/// Extensions Roku players can stream directly.
const ROKU_FILE_EXTENSIONS: &[&str] = &[".mp4", ".m4v", ".mov"];
const ROKU_STREAM_MANIFESTS: &[&str] = &[".m3u8", ".mpd"];

/// Keys counted as videos in storage statistics.
const VIDEO_KEY_SUFFIXES: &[&str] = &[".mp4", ".mov", ".avi"];

/// Largest video accepted for upload (2 GiB).
pub const MAX_VIDEO_UPLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,
    #[error("File must be a video")]
    NotAVideo,
    #[error("File must be an image")]
    NotAnImage,
    #[error("File size must be less than 2GB")]
    TooLarge,
    #[error("Invalid filename: {0}")]
    InvalidFilename(&'static str),
}

/// A URL is a playable video URL when it is http(s) and names a supported container.
pub fn is_valid_video_url(url: &str) -> bool {
    let has_scheme = ["http://", "https://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));

    let lower = url.to_lowercase();
    let has_extension = VIDEO_URL_EXTENSIONS.iter().any(|ext| lower.contains(ext));

    has_scheme && has_extension
}

pub fn is_roku_compatible_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    ROKU_FILE_EXTENSIONS
        .iter()
        .chain(ROKU_STREAM_MANIFESTS)
        .any(|ext| lower.contains(ext))
}

pub fn is_video_key(key: &str) -> bool {
    VIDEO_KEY_SUFFIXES.iter().any(|ext| key.ends_with(ext))
}

/// MIME type for an object key, falling back to `mime_guess` and then octet-stream.
pub fn content_type_for_key(key: &str) -> String {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    let known = match ext.as_str() {
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        "mkv" => Some("video/x-matroska"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "json" => Some("application/json"),
        _ => None,
    };

    match known {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(key)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

/// Normalize an uploaded filename into a URL-safe object name.
pub fn sanitize_upload_filename(name: &str) -> Result<String, UploadError> {
    let mut cleaned = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' && cleaned.ends_with('-') {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.trim_matches('-');

    if cleaned.is_empty() {
        return Err(UploadError::InvalidFilename("filename cannot be empty"));
    }
    if cleaned.contains("..") {
        return Err(UploadError::InvalidFilename("'..' is not allowed"));
    }
    if cleaned.starts_with('.') {
        return Err(UploadError::InvalidFilename("hidden files are not allowed"));
    }
    Ok(cleaned.to_string())
}

/// Storage key for an upload: `{folder}/{timestamp}-{filename}`.
pub fn object_key(folder: &str, timestamp_ms: i64, filename: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{timestamp_ms}-{filename}")
    } else {
        format!("{folder}/{timestamp_ms}-{filename}")
    }
}

/// Whether a storage key is safe to hand to a backend.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\0')
        && !key.chars().any(|c| c.is_ascii_control())
        && !key.split(['/', '\\']).any(|segment| segment == "..")
}

pub fn check_video_upload(content_type: &str, size: u64) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::MissingFile);
    }
    if !content_type.starts_with("video/") {
        return Err(UploadError::NotAVideo);
    }
    if size > MAX_VIDEO_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}

pub fn check_thumbnail_upload(content_type: &str, size: u64) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::MissingFile);
    }
    if !content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage);
    }
    Ok(())
}
