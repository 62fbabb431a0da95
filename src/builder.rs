use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::IngestConfig;
use crate::error::ImportError;
use crate::ingest::Orchestrator;
use crate::ocr::{GoogleVisionRecognizer, TextRecognizer};
use crate::pipelines;
use crate::store::NormalizedRecipe;

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Ingest a recipe page
    Url(String),
    /// Parse pasted plain text or markdown
    Text(String),
    /// OCR one or more photos of a recipe, in page order
    Images(Vec<PathBuf>),
}

/// Builder for configuring and executing recipe imports
#[derive(Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    config: Option<IngestConfig>,
    timeout: Option<Duration>,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to plain text
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .text("Ingredients\n2 eggs\n\nMethod\nWhisk the eggs.");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    /// Add an image file to OCR. Call repeatedly for multi-page recipes.
    ///
    /// Uses Google Cloud Vision unless [`recognizer`](Self::recognizer) is set;
    /// that needs `GOOGLE_API_KEY` or `ocr.api_key` in the config.
    pub fn image(mut self, image_path: impl Into<PathBuf>) -> Self {
        let path = image_path.into();
        match &mut self.source {
            Some(InputSource::Images(paths)) => paths.push(path),
            _ => self.source = Some(InputSource::Images(vec![path])),
        }
        self
    }

    /// Use this configuration instead of loading `recipe-ingest.toml` and the
    /// environment.
    pub fn config(mut self, config: IngestConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for direct page fetches
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Replace the text recognition backend used for images.
    pub fn recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Build and execute the recipe import operation
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified
    /// - Every ingestion stage failed (`ImportError::Ingestion`)
    /// - The text or OCR output holds no recipe
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_ingest::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipe = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .build()
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<NormalizedRecipe, ImportError> {
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .url(), .text() or .image()".to_string(),
            )
        })?;

        match source {
            InputSource::Url(url) => {
                let mut config = match self.config {
                    Some(config) => config,
                    None => IngestConfig::load()?,
                };
                if let Some(timeout) = self.timeout {
                    config.fetch_timeout_secs = timeout.as_secs().max(1);
                }
                let orchestrator = Orchestrator::from_config(&config)?;
                Ok(pipelines::url::process(&orchestrator, &url).await?.recipe)
            }
            InputSource::Text(text) => pipelines::text::process(&text),
            InputSource::Images(paths) => {
                let recognizer = match self.recognizer {
                    Some(recognizer) => recognizer,
                    None => {
                        let config = match self.config {
                            Some(config) => config,
                            None => IngestConfig::load()?,
                        };
                        Arc::new(GoogleVisionRecognizer::from_config(&config.ocr)?)
                    }
                };
                pipelines::image::process(recognizer.as_ref(), &paths).await
            }
        }
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedText {
        async fn recognize(&self, _image_data: &[u8]) -> Result<String, ImportError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_missing_source() {
        let result = RecipeImporter::builder().build().await;
        assert!(matches!(result, Err(ImportError::BuilderError(_))));
    }

    #[tokio::test]
    async fn test_images_accumulate() {
        let builder = RecipeImporter::builder().image("a.jpg").image("b.jpg");
        match builder.source {
            Some(InputSource::Images(paths)) => assert_eq!(paths.len(), 2),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_image_with_custom_recognizer() {
        let dir = std::env::temp_dir().join("recipe-ingest-builder-test.jpg");
        tokio::fs::write(&dir, b"not really a jpeg").await.unwrap();
        let recipe = RecipeImporter::builder()
            .image(dir.clone())
            .recognizer(Arc::new(FixedText(
                "Egg Salad\nIngredients\n4 eggs\n2 tbsp mayonnaise\n\
                 Method\nBoil the eggs for 10 minutes.\nMash with the mayonnaise.",
            )))
            .build()
            .await
            .unwrap();
        assert_eq!(recipe.ingredients, vec!["4 eggs", "2 tbsp mayonnaise"]);
        assert_eq!(recipe.instructions.len(), 2);
        tokio::fs::remove_file(&dir).await.ok();
    }
}
