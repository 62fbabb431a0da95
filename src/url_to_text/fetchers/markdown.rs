use super::request::transport_error_code;
use crate::config::MarkdownServiceConfig;
use crate::error::{ImportError, IngestionErrorCode};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct MarkdownRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct MarkdownResponse {
    #[serde(default)]
    success: bool,
    title: Option<String>,
    #[serde(default)]
    content: String,
}

/// A page as converted by the markdown extraction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub title: Option<String>,
    pub content: String,
}

pub struct MarkdownFetcher {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl MarkdownFetcher {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ImportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    /// `None` when no endpoint is configured.
    pub fn from_config(config: &MarkdownServiceConfig) -> Result<Option<Self>, ImportError> {
        match config.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => Self::new(
                endpoint,
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<MarkdownDocument, IngestionErrorCode> {
        debug!("Requesting markdown for {url}");
        let mut request = self.client.post(&self.endpoint).json(&MarkdownRequest { url });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| transport_error_code(url, &e))?;

        if !response.status().is_success() {
            warn!(
                "Markdown service failed with status: {} for {url}",
                response.status()
            );
            return Err(IngestionErrorCode::FetchFailed);
        }

        let body: MarkdownResponse = response.json().await.map_err(|e| {
            warn!("Markdown service sent an unreadable response for {url}: {e}");
            IngestionErrorCode::ParseFailed
        })?;
        if !body.success {
            return Err(IngestionErrorCode::FetchFailed);
        }
        if body.content.trim().is_empty() {
            return Err(IngestionErrorCode::NoRecipeData);
        }
        Ok(MarkdownDocument {
            title: body.title.filter(|t| !t.trim().is_empty()),
            content: body.content,
        })
    }
}
