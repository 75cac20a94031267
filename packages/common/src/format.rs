//! Human-readable formatting for durations, sizes, counts and timestamps.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a duration in seconds as `H:MM:SS`, or `M:SS` when under an hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Format a byte count using 1024-based units with at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    format!("{} {}", trim_decimals(&format!("{value:.2}")), SIZE_UNITS[unit])
}

fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format a view count as `999`, `1.5K`, `2.0M`, `1.1B`.
pub fn format_view_count(count: u64) -> String {
    const STEPS: [(u64, &str); 3] = [
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (unit, suffix) in STEPS {
        if count >= unit {
            // Round half up to one decimal without going through floats.
            let tenths = (count as u128 * 10 + unit as u128 / 2) / unit as u128;
            return format!("{}.{}{suffix}", tenths / 10, tenths % 10);
        }
    }
    count.to_string()
}

/// Format `then` relative to `now`, e.g. `3 days ago`.
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds();

    if diff < 60 {
        return "Just now".to_string();
    }
    if diff < 3_600 {
        return format!("{} minutes ago", diff / 60);
    }
    if diff < 86_400 {
        return format!("{} hours ago", diff / 3_600);
    }
    if diff < 2_592_000 {
        return format!("{} days ago", diff / 86_400);
    }
    if diff < 31_536_000 {
        return format!("{} months ago", diff / 2_592_000);
    }
    format!("{} years ago", diff / 31_536_000)
}

/// Guess a resolution label from the average bitrate.
pub fn estimate_video_quality(file_size: u64, duration: u64) -> &'static str {
    if file_size == 0 || duration == 0 {
        return "Unknown";
    }

    let bitrate = (file_size as f64 * 8.0) / duration as f64;
    if bitrate > 5_000_000.0 {
        "1080p"
    } else if bitrate > 2_500_000.0 {
        "720p"
    } else if bitrate > 1_000_000.0 {
        "480p"
    } else {
        "360p"
    }
}

/// Swap the extension of a video URL for `.jpg`.
pub fn thumbnail_url_for(video_url: &str) -> String {
    let name_start = video_url.rfind('/').map_or(0, |i| i + 1);
    let base = match video_url[name_start..].rfind('.') {
        Some(dot) => &video_url[..name_start + dot],
        None => video_url,
    };
    format!("{base}.jpg")
}

/// File stem of the last path segment of a URL or filename.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let file_name = url.rsplit('/').next().unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    (!stem.is_empty()).then_some(stem)
}
