use super::request::transport_error_code;
use crate::config::RenderConfig;
use crate::error::{ImportError, IngestionErrorCode};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
}

/// JavaScript-executed page as returned by the render worker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub final_url: Option<String>,
    #[serde(default)]
    pub html: String,
    /// JSON-LD blocks the worker already pulled out of the live DOM.
    #[serde(default)]
    pub json_ld: Vec<Value>,
}

/// Client for the external render worker.
pub struct RenderFetcher {
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
    client: Client,
}

impl RenderFetcher {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ImportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.filter(|t| !t.trim().is_empty()),
            timeout,
            client,
        })
    }

    /// `None` when the feature flag is off or no endpoint is configured.
    pub fn from_config(config: &RenderConfig) -> Result<Option<Self>, ImportError> {
        if !config.is_active() {
            return Ok(None);
        }
        let Some(endpoint) = config.endpoint.clone() else {
            return Ok(None);
        };
        Self::new(endpoint, config.token.clone(), config.timeout()).map(Some)
    }

    /// Render `url`. The whole exchange is bounded by the configured timeout.
    pub async fn render(&self, url: &str) -> Result<RenderedPage, IngestionErrorCode> {
        match tokio::time::timeout(self.timeout, self.request(url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Render worker timed out after {:?} for {url}", self.timeout);
                Err(IngestionErrorCode::Timeout)
            }
        }
    }

    async fn request(&self, url: &str) -> Result<RenderedPage, IngestionErrorCode> {
        debug!("Requesting rendered HTML for {url}");
        let mut request = self.client.post(&self.endpoint).json(&RenderRequest { url });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| transport_error_code(url, &e))?;

        if !response.status().is_success() {
            warn!(
                "Render worker failed with status: {} for {url}",
                response.status()
            );
            return Err(IngestionErrorCode::FetchFailed);
        }

        let page: RenderedPage = response.json().await.map_err(|e| {
            warn!("Render worker sent an unreadable response for {url}: {e}");
            if e.is_timeout() {
                IngestionErrorCode::Timeout
            } else {
                IngestionErrorCode::FetchFailed
            }
        })?;
        if page.html.trim().is_empty() && page.json_ld.is_empty() {
            return Err(IngestionErrorCode::NoRecipeData);
        }
        Ok(page)
    }
}
