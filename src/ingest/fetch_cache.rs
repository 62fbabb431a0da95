use crate::error::IngestionErrorCode;
use crate::url_to_text::fetchers::{FetchedPage, RequestFetcher};
use tokio::sync::OnceCell;

/// Per-request memo of page fetches shared by the stages.
///
/// The direct fetch happens at most once per request whether the HTML stage,
/// readability or metadata hydration asks for it first.
#[derive(Debug, Default)]
pub struct FetchCache {
    direct: OnceCell<Result<FetchedPage, IngestionErrorCode>>,
    rendered_html: OnceCell<String>,
    render_error: OnceCell<IngestionErrorCode>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn direct(
        &self,
        fetcher: &RequestFetcher,
        url: &str,
    ) -> Result<&FetchedPage, IngestionErrorCode> {
        self.direct
            .get_or_init(|| fetcher.fetch(url))
            .await
            .as_ref()
            .map_err(|code| *code)
    }

    /// True once a direct fetch has completed, successfully or not.
    pub fn direct_attempted(&self) -> bool {
        self.direct.initialized()
    }

    /// Only the first rendered page is kept.
    pub fn store_rendered_html(&self, html: String) {
        let _ = self.rendered_html.set(html);
    }

    pub fn rendered_html(&self) -> Option<&str> {
        self.rendered_html.get().map(String::as_str)
    }

    pub fn store_render_error(&self, code: IngestionErrorCode) {
        let _ = self.render_error.set(code);
    }

    /// Why the render worker produced no page, if it was asked and failed.
    pub fn render_error(&self) -> Option<IngestionErrorCode> {
        self.render_error.get().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_html_first_write_wins() {
        let cache = FetchCache::new();
        assert!(cache.rendered_html().is_none());
        cache.store_rendered_html("<p>one</p>".into());
        cache.store_rendered_html("<p>two</p>".into());
        assert_eq!(cache.rendered_html(), Some("<p>one</p>"));
        assert!(!cache.direct_attempted());
    }

    #[test]
    fn test_render_error_is_remembered() {
        let cache = FetchCache::new();
        assert!(cache.render_error().is_none());
        cache.store_render_error(IngestionErrorCode::Timeout);
        assert_eq!(cache.render_error(), Some(IngestionErrorCode::Timeout));
    }
}
