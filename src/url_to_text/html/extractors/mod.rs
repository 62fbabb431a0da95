use crate::error::ImportError;
use crate::model::RecipeDraft;
use log::debug;
use scraper::{ElementRef, Html};

mod html_class;
mod json_ld;
mod microdata;

pub use html_class::HtmlClassExtractor;
pub use json_ld::{
    convert_duration, find_recipe_value, flatten_instructions, parse_instructions,
    InstructionNode, JsonLdExtractor,
};
pub use microdata::MicroDataExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

pub trait Extractor {
    fn name(&self) -> &'static str;
    fn parse(&self, context: &ParsingContext) -> Result<RecipeDraft, ImportError>;
}

/// Structured-data extractors in trust order: JSON-LD, microdata, then
/// recipe-card plugin class names.
pub fn structured_extractors() -> [&'static dyn Extractor; 3] {
    [&JsonLdExtractor, &MicroDataExtractor, &HtmlClassExtractor]
}

/// First structured extractor that yields ingredients or instructions.
pub fn extract_structured(context: &ParsingContext) -> Option<RecipeDraft> {
    for extractor in structured_extractors() {
        match extractor.parse(context) {
            Ok(draft) if draft.has_content() => {
                debug!("{} extracted recipe from {}", extractor.name(), context.url);
                return Some(draft);
            }
            Ok(_) => debug!("{} found an empty recipe", extractor.name()),
            Err(e) => debug!("{} failed: {}", extractor.name(), e),
        }
    }
    None
}

/// Whitespace-joined text of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
