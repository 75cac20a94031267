//! Search-engine copy suggested to editors when they fill in the video form.

use serde::Serialize;
use thiserror::Error;

const BASE_KEYWORDS: &[&str] = &[
    "flat earth",
    "flat earth channel",
    "documentary",
    "research",
    "truth",
];
const TITLE_STOP_WORDS: &[&str] = &["with", "from", "this", "that", "and", "for"];
const MAX_KEYWORDS: usize = 10;
const MAX_DESCRIPTION_WORDS: usize = 5;
const DESCRIPTION_PREFIX_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please provide title and description before generating SEO content")]
pub struct SeoError;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SeoSuggestion {
    pub seo_description: String,
    pub seo_keywords: Vec<String>,
}

fn category_keywords(category_id: &str) -> &'static [&'static str] {
    match category_id {
        "documentaries" => &["documentary film", "flat earth documentary"],
        "educational" => &["flat earth education", "earth science"],
        "interviews" => &["flat earth interview", "researcher interview"],
        "featured" => &["featured flat earth", "top flat earth video"],
        _ => &[],
    }
}

pub fn generate(
    title: &str,
    description: &str,
    category_id: &str,
) -> Result<SeoSuggestion, SeoError> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(SeoError);
    }

    let mut summary: String = description.chars().take(DESCRIPTION_PREFIX_CHARS).collect();
    if description.chars().count() > DESCRIPTION_PREFIX_CHARS {
        summary.push_str("...");
    }
    let seo_description = format!(
        "{summary} Watch this enlightening video on FEChannel.com, the premier platform for \
         flat earth research and documentaries. {title} provides compelling evidence and \
         critical analysis for truth-seekers."
    );

    let title_lower = title.to_lowercase();
    let title_words: Vec<&str> = title_lower
        .split(' ')
        .filter(|w| w.chars().count() > 3 && !TITLE_STOP_WORDS.contains(w))
        .collect();

    let description_lower = description.to_lowercase();
    let description_words: Vec<&str> = description_lower
        .split(' ')
        .filter(|w| {
            w.chars().count() > 5 && !BASE_KEYWORDS.contains(w) && !title_words.contains(w)
        })
        .take(MAX_DESCRIPTION_WORDS)
        .collect();

    let mut candidates: Vec<&str> = BASE_KEYWORDS.to_vec();
    candidates.extend(&title_words);
    candidates.extend(&description_words);
    candidates.extend(category_keywords(category_id).iter().copied());

    let mut seo_keywords: Vec<String> = Vec::new();
    for word in candidates {
        if !seo_keywords.iter().any(|k| k == word) {
            seo_keywords.push(word.to_string());
        }
    }
    seo_keywords.truncate(MAX_KEYWORDS);

    Ok(SeoSuggestion {
        seo_description,
        seo_keywords,
    })
}
