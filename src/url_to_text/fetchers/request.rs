use crate::config::IngestConfig;
use crate::error::{ImportError, IngestionErrorCode};
use log::{debug, warn};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Statuses bot walls answer with.
const BLOCK_STATUSES: [StatusCode; 3] = [
    StatusCode::FORBIDDEN,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// Interstitial markers that only appear on challenge pages.
const CHALLENGE_MARKERS: &[&str] = &[
    "<title>just a moment",
    "cf-chl",
    "/cdn-cgi/challenge-platform",
    "attention required! | cloudflare",
    "cf-browser-verification",
];

/// Real recipe pages embed captcha widgets in comment forms, so the bare
/// word only counts on small pages without structured data.
const CAPTCHA_MARKER: &str = "captcha";
const CHALLENGE_PAGE_MAX_BYTES: usize = 32 * 1024;

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: String,
    pub html: String,
}

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self, ImportError> {
        Self::new(&config.user_agent, config.fetch_timeout())
    }

    /// GET the page, classifying bot walls as `Blocked` and client timeouts
    /// as `Timeout`. Every other failure is `FetchFailed`.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, IngestionErrorCode> {
        debug!("Fetching {url}");
        let response = self
            .client
            .get(url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| transport_error_code(url, &e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if let Some(code) = classify_status(status) {
            warn!("Fetching {url} failed with status {status}");
            return Err(code);
        }

        let html = response
            .text()
            .await
            .map_err(|e| transport_error_code(url, &e))?;
        if looks_like_challenge(&html) {
            warn!("Fetching {url} returned a challenge page");
            return Err(IngestionErrorCode::Blocked);
        }

        Ok(FetchedPage { final_url, html })
    }
}

/// Failure code for a non-success status; `None` for 2xx.
pub fn classify_status(status: StatusCode) -> Option<IngestionErrorCode> {
    if BLOCK_STATUSES.contains(&status) {
        Some(IngestionErrorCode::Blocked)
    } else if status.is_success() {
        None
    } else {
        Some(IngestionErrorCode::FetchFailed)
    }
}

pub fn looks_like_challenge(body: &str) -> bool {
    let lowered = body.to_lowercase();
    if CHALLENGE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return true;
    }
    body.len() <= CHALLENGE_PAGE_MAX_BYTES
        && lowered.contains(CAPTCHA_MARKER)
        && !lowered.contains("application/ld+json")
}

pub(crate) fn transport_error_code(url: &str, error: &reqwest::Error) -> IngestionErrorCode {
    if error.is_timeout() {
        warn!("Fetching {url} timed out");
        IngestionErrorCode::Timeout
    } else {
        warn!("Fetching {url} failed: {error}");
        IngestionErrorCode::FetchFailed
    }
}
