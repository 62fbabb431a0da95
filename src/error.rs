use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a single ingestion stage (or the whole run) failed to produce a recipe.
///
/// The string form is what callers put in the redirect query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionErrorCode {
    FetchFailed,
    Blocked,
    Timeout,
    NoRecipeData,
    InsufficientSteps,
    ParseFailed,
    Disabled,
}

impl IngestionErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionErrorCode::FetchFailed => "fetch_failed",
            IngestionErrorCode::Blocked => "blocked",
            IngestionErrorCode::Timeout => "timeout",
            IngestionErrorCode::NoRecipeData => "no_recipe_data",
            IngestionErrorCode::InsufficientSteps => "insufficient_steps",
            IngestionErrorCode::ParseFailed => "parse_failed",
            IngestionErrorCode::Disabled => "disabled",
        }
    }
}

impl fmt::Display for IngestionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Every ingestion stage failed; `code` is the classified failure reason
    #[error("Recipe ingestion failed: {code}")]
    Ingestion { code: IngestionErrorCode },

    /// Failed to fetch from a remote service
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Failed to parse recipe content
    #[error("Failed to parse recipe: {0}")]
    ParseError(String),

    /// Invalid JSON payload
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Text recognition failed or returned nothing
    #[error("OCR failed: {0}")]
    OcrError(String),

    /// Recipe store rejected an operation
    #[error("Recipe store error: {0}")]
    StoreError(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImportError {
    /// The failure reason to surface to the user, if this error came out of ingestion.
    pub fn ingestion_code(&self) -> Option<IngestionErrorCode> {
        match self {
            ImportError::Ingestion { code } => Some(*code),
            _ => None,
        }
    }
}

impl From<IngestionErrorCode> for ImportError {
    fn from(code: IngestionErrorCode) -> Self {
        ImportError::Ingestion { code }
    }
}
