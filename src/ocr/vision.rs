use crate::config::OcrConfig;
use crate::error::ImportError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;
use tokio::fs;

/// Image to text. The recognition engine itself is an external service.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image_data: &[u8]) -> Result<String, ImportError>;

    async fn recognize_file(&self, image_path: &Path) -> Result<String, ImportError> {
        let image_data = fs::read(image_path).await?;
        self.recognize(&image_data).await
    }
}

/// Google Cloud Vision `TEXT_DETECTION` client.
pub struct GoogleVisionRecognizer {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl GoogleVisionRecognizer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// The API key comes from the config, else from `GOOGLE_API_KEY`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, ImportError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                ImportError::OcrError("GOOGLE_API_KEY environment variable not set".to_string())
            })?;
        Ok(Self::new(config.endpoint.clone(), api_key))
    }
}

#[async_trait]
impl TextRecognizer for GoogleVisionRecognizer {
    async fn recognize(&self, image_data: &[u8]) -> Result<String, ImportError> {
        let request_body = json!({
            "requests": [{
                "image": {
                    "content": STANDARD.encode(image_data)
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }]
            }]
        });

        debug!("Sending OCR request to Google Vision API");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("Accept-Encoding", "identity")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(ImportError::OcrError(format!(
                "Google Vision API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;

        // All detected text is in the first annotation
        let text = response_body["responses"][0]["fullTextAnnotation"]["text"]
            .as_str()
            .ok_or_else(|| ImportError::OcrError("No text found in image".to_string()))?
            .to_string();

        if text.trim().is_empty() {
            return Err(ImportError::OcrError("No text detected in image".to_string()));
        }

        debug!("Extracted text from image: {} characters", text.len());

        Ok(text)
    }
}
