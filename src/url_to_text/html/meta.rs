use crate::model::RecipeDraft;
use crate::normalize::{collapse_whitespace, decode_entities};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

const IMAGE_KEYS: &[&str] = &["og:image", "og:image:url", "og:image:secure_url", "twitter:image"];
const VIDEO_KEYS: &[&str] = &["og:video:secure_url", "og:video:url", "og:video"];

/// Page-level metadata from `<meta>` tags (Open Graph, Twitter cards, keywords).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
}

impl PageMetadata {
    pub fn from_document(document: &Html) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for meta in document.select(&META) {
            let element = meta.value();
            let Some(key) = element.attr("property").or_else(|| element.attr("name")) else {
                continue;
            };
            let Some(content) = element.attr("content") else {
                continue;
            };
            let content = collapse_whitespace(&decode_entities(content));
            if !content.is_empty() {
                pairs.push((key.trim().to_ascii_lowercase(), content));
            }
        }
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()))
        };

        let mut tags: Vec<String> = Vec::new();
        for (key, value) in &pairs {
            let parts: Vec<&str> = match key.as_str() {
                "article:tag" => vec![value.as_str()],
                "keywords" => value.split(',').collect(),
                _ => continue,
            };
            for part in parts {
                let tag = part.trim();
                if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                    tags.push(tag.to_string());
                }
            }
        }

        PageMetadata {
            title: first(&["og:title", "twitter:title"]).or_else(|| {
                document
                    .select(&TITLE)
                    .next()
                    .map(|t| collapse_whitespace(&t.text().collect::<String>()))
                    .filter(|t| !t.is_empty())
            }),
            description: first(&["og:description", "description", "twitter:description"]),
            image_url: first(IMAGE_KEYS),
            video_url: first(VIDEO_KEYS),
            tags,
        }
    }

    /// As a draft carrying only metadata, for backfilling another draft.
    pub fn as_draft(&self) -> RecipeDraft {
        RecipeDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            video_url: self.video_url.clone(),
            tags: self.tags.clone(),
            ..Default::default()
        }
    }
}
