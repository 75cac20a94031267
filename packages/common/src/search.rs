use crate::video::Video;

/// Case-insensitive substring match against title, description and tags.
///
/// `needle` must already be lowercased.
fn matches_lowercase(video: &Video, needle: &str) -> bool {
    video.title.to_lowercase().contains(needle)
        || video.description.to_lowercase().contains(needle)
        || video
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

pub fn matches(video: &Video, query: &str) -> bool {
    matches_lowercase(video, &query.to_lowercase())
}

/// Filter `videos` by `query`, preserving input order. Blank queries match nothing.
pub fn search_videos<'a, I>(videos: I, query: &str) -> Vec<&'a Video>
where
    I: IntoIterator<Item = &'a Video>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    videos
        .into_iter()
        .filter(|video| matches_lowercase(video, &needle))
        .collect()
}
