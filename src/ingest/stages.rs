use super::fetch_cache::FetchCache;
use crate::error::IngestionErrorCode;
use crate::model::{IngestionStage, RecipeDraft};
use crate::url_to_text::fetchers::{MarkdownFetcher, RenderFetcher, RequestFetcher};
use crate::url_to_text::html::extractors::{extract_structured, JsonLdExtractor, ParsingContext};
use crate::url_to_text::html::{extract_readability, PageMetadata};
use crate::url_to_text::markdown::parse_markdown_recipe;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

/// A stage either produces a draft or says why it could not.
/// `Err(Disabled)` means the stage was skipped, not that it failed.
pub type StageOutcome = Result<StageDraft, IngestionErrorCode>;

/// A draft plus the error of any step the stage had to work around and the
/// HTML it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct StageDraft {
    pub draft: RecipeDraft,
    pub error: Option<IngestionErrorCode>,
    pub raw_html: Option<String>,
}

impl StageDraft {
    pub fn with_error(mut self, error: Option<IngestionErrorCode>) -> Self {
        self.error = error;
        self
    }

    pub fn with_raw_html(mut self, html: impl Into<String>) -> Self {
        self.raw_html = Some(html.into());
        self
    }
}

impl From<RecipeDraft> for StageDraft {
    fn from(draft: RecipeDraft) -> Self {
        Self {
            draft,
            error: None,
            raw_html: None,
        }
    }
}

/// Per-request state handed to every stage.
pub struct StageContext<'a> {
    pub url: &'a str,
    pub cache: &'a FetchCache,
}

#[async_trait]
pub trait StageHandler: Send + Sync {
    fn stage(&self) -> IngestionStage;
    async fn run(&self, context: &StageContext<'_>) -> StageOutcome;
}

/// Fill the draft's empty metadata from the page's meta tags.
pub(crate) fn apply_page_metadata(draft: &mut RecipeDraft, context: &ParsingContext) {
    let meta = PageMetadata::from_document(&context.document);
    if draft.title.is_none() {
        draft.title = meta.title.clone();
    }
    draft.backfill_metadata(&meta.as_draft());
}

fn with_content(draft: Option<RecipeDraft>) -> Result<RecipeDraft, IngestionErrorCode> {
    draft
        .filter(RecipeDraft::has_content)
        .ok_or(IngestionErrorCode::NoRecipeData)
}

/// Markdown extraction service.
pub struct MarkdownStage {
    fetcher: Option<MarkdownFetcher>,
}

impl MarkdownStage {
    pub fn new(fetcher: Option<MarkdownFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl StageHandler for MarkdownStage {
    fn stage(&self) -> IngestionStage {
        IngestionStage::Markdown
    }

    async fn run(&self, context: &StageContext<'_>) -> StageOutcome {
        let fetcher = self.fetcher.as_ref().ok_or(IngestionErrorCode::Disabled)?;
        let document = fetcher.fetch(context.url).await?;
        let draft = with_content(parse_markdown_recipe(
            &document.content,
            document.title.as_deref(),
        ))?;
        Ok(draft.into())
    }
}

/// Direct fetch: JSON-LD, then microdata, then recipe-card classes.
pub struct HttpHtmlStage {
    fetcher: Arc<RequestFetcher>,
}

impl HttpHtmlStage {
    pub fn new(fetcher: Arc<RequestFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl StageHandler for HttpHtmlStage {
    fn stage(&self) -> IngestionStage {
        IngestionStage::HttpHtml
    }

    async fn run(&self, context: &StageContext<'_>) -> StageOutcome {
        let page = context.cache.direct(&self.fetcher, context.url).await?;
        let parsing = ParsingContext::new(&page.final_url, &page.html);
        let mut draft = with_content(extract_structured(&parsing))?;
        apply_page_metadata(&mut draft, &parsing);
        Ok(StageDraft::from(draft).with_raw_html(page.html.as_str()))
    }
}

/// Render worker fallback for pages that need JavaScript or block bots.
pub struct RenderedHtmlStage {
    fetcher: Option<RenderFetcher>,
}

impl RenderedHtmlStage {
    pub fn new(fetcher: Option<RenderFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl StageHandler for RenderedHtmlStage {
    fn stage(&self) -> IngestionStage {
        IngestionStage::RenderedHtml
    }

    async fn run(&self, context: &StageContext<'_>) -> StageOutcome {
        let fetcher = self.fetcher.as_ref().ok_or(IngestionErrorCode::Disabled)?;
        let page = match fetcher.render(context.url).await {
            Ok(page) => page,
            Err(code) => {
                context.cache.store_render_error(code);
                return Err(code);
            }
        };
        let final_url = page.final_url.as_deref().unwrap_or(context.url);
        let parsing = ParsingContext::new(final_url, &page.html);

        let from_worker = JsonLdExtractor
            .parse_values(&page.json_ld)
            .filter(RecipeDraft::has_content);
        if from_worker.is_some() {
            debug!("Using JSON-LD supplied by the render worker");
        }
        let draft = from_worker.or_else(|| extract_structured(&parsing));
        // Readability runs over this page when nothing structured was found.
        context.cache.store_rendered_html(page.html.clone());
        let mut draft = with_content(draft)?;
        apply_page_metadata(&mut draft, &parsing);
        Ok(StageDraft::from(draft).with_raw_html(page.html))
    }
}

/// Main-content heuristic over the rendered HTML, else the direct HTML.
/// A draft taken from the direct HTML after a failed render carries the
/// render error.
pub struct ReadabilityStage {
    fetcher: Arc<RequestFetcher>,
}

impl ReadabilityStage {
    pub fn new(fetcher: Arc<RequestFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl StageHandler for ReadabilityStage {
    fn stage(&self) -> IngestionStage {
        IngestionStage::Readability
    }

    async fn run(&self, context: &StageContext<'_>) -> StageOutcome {
        let (page_url, html, error) = match context.cache.rendered_html() {
            Some(html) => (context.url, html, None),
            None => {
                let page = context.cache.direct(&self.fetcher, context.url).await?;
                (
                    page.final_url.as_str(),
                    page.html.as_str(),
                    context.cache.render_error(),
                )
            }
        };
        if let Some(code) = error {
            debug!("Readability is using the direct page after a render failure ({code})");
        }
        let mut draft = with_content(extract_readability(html))?;
        apply_page_metadata(&mut draft, &ParsingContext::new(page_url, html));
        Ok(StageDraft::from(draft).with_error(error).with_raw_html(html))
    }
}
