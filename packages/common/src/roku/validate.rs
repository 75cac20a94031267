use serde::Serialize;
use serde_json::Value;

/// Result of checking a feed document's structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub total_videos: usize,
    pub categories: Vec<String>,
}

/// JavaScript-style truthiness, which is what feed producers rely on.
fn present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Check a feed in the network export shape (`categories[].videos[]`).
///
/// Only a missing `lastUpdated` is a warning; every other problem is an error
/// and makes the feed invalid.
pub fn validate_feed(feed: &Value) -> FeedValidation {
    let mut report = FeedValidation::default();

    let Some(feed) = feed.as_object() else {
        report.errors.push("Feed is empty or invalid".into());
        return report;
    };

    let categories = feed.get("categories").and_then(Value::as_array);
    if categories.is_none() {
        report
            .errors
            .push("Missing or invalid categories array".into());
    }

    if !present(feed.get("lastUpdated")) {
        report
            .warnings
            .push("Missing lastUpdated timestamp".into());
    }

    for (index, category) in categories.into_iter().flatten().enumerate() {
        let name = category.get("name");
        let label = if present(name) {
            let name = name.map(display).unwrap_or_default();
            report.categories.push(name.clone());
            name
        } else {
            report.errors.push(format!("Category {index} missing name"));
            index.to_string()
        };

        let Some(videos) = category.get("videos").and_then(Value::as_array) else {
            report.errors.push(format!(
                "Category \"{label}\" missing or invalid videos array"
            ));
            continue;
        };
        report.total_videos += videos.len();

        for (video_index, video) in videos.iter().enumerate() {
            let prefix = format!("Video {video_index} in category \"{label}\"");
            if !present(video.get("id")) {
                report.errors.push(format!("{prefix} missing id"));
            }
            if !present(video.get("title")) {
                report.errors.push(format!("{prefix} missing title"));
            }
            let has_streams = video
                .get("content")
                .and_then(|content| content.get("videos"))
                .is_some_and(Value::is_array);
            if !has_streams {
                report
                    .errors
                    .push(format!("{prefix} missing content.videos array"));
            }
        }
    }

    report.is_valid = report.errors.is_empty();
    report
}
