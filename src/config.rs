use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main ingestion configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// User agent sent on direct page fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Direct HTML fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Markdown extraction service
    #[serde(default)]
    pub markdown: MarkdownServiceConfig,
    /// Render worker (JavaScript-executed HTML) fallback
    #[serde(default)]
    pub render: RenderConfig,
    /// Candidate scoring thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Text recognition service for recipe photos
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Configuration for the markdown extraction service
#[derive(Debug, Deserialize, Clone)]
pub struct MarkdownServiceConfig {
    /// Service endpoint; the markdown stage is skipped when unset
    pub endpoint: Option<String>,
    /// Optional bearer token
    pub api_key: Option<String>,
    #[serde(default = "default_markdown_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MarkdownServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_markdown_timeout_secs(),
        }
    }
}

/// Configuration for the render worker fallback
#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// Feature flag; the rendered stage only runs when set and an endpoint exists
    #[serde(default)]
    pub enabled: bool,
    pub endpoint: Option<String>,
    /// Bearer token for the worker
    pub token: Option<String>,
    #[serde(default = "default_render_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            token: None,
            timeout_ms: default_render_timeout_ms(),
        }
    }
}

impl RenderConfig {
    /// True when the rendered stage should be attempted at all.
    pub fn is_active(&self) -> bool {
        self.enabled && self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Quality score thresholds used by the orchestrator
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// A candidate at or above this score stops the stage loop
    #[serde(default = "default_high_confidence_score")]
    pub high_confidence_score: f64,
    /// The winner must reach this score to be accepted
    #[serde(default = "default_min_acceptable_score")]
    pub min_acceptable_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_confidence_score: default_high_confidence_score(),
            min_acceptable_score: default_min_acceptable_score(),
        }
    }
}

/// Configuration for the Google Cloud Vision text recognizer
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,
    /// Falls back to the GOOGLE_API_KEY environment variable
    pub api_key: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ocr_endpoint(),
            api_key: None,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            markdown: MarkdownServiceConfig::default(),
            render: RenderConfig::default(),
            scoring: ScoringConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

// Default value functions
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_markdown_timeout_secs() -> u64 {
    20
}

fn default_render_timeout_ms() -> u64 {
    12_000
}

fn default_ocr_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_high_confidence_score() -> f64 {
    60.0
}

fn default_min_acceptable_score() -> f64 {
    15.0
}

impl IngestConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_INGEST__ prefix
    /// 2. recipe-ingest.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_INGEST__RENDER__ENDPOINT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<IngestConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-ingest").required(false))
        // Use double underscore for nested: RECIPE_INGEST__RENDER__TOKEN
        .add_source(
            Environment::with_prefix("RECIPE_INGEST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
