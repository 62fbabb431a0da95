pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod ocr;
pub mod pipelines;
pub mod prep_groups;
pub mod sections;
pub mod shopping;
pub mod store;
pub mod url_to_text;

// Re-export commonly used types
pub use builder::{InputSource, RecipeImporter, RecipeImporterBuilder};
pub use classify::{
    canonical_key, classify, IngredientCategory, IngredientClassification, MatchSource,
};
pub use config::IngestConfig;
pub use error::{ImportError, IngestionErrorCode};
pub use ingest::{IngestionDiagnostics, IngestionReport, Orchestrator, StageHandler};
pub use model::{
    IngestionAttemptResult, IngestionStage, IngredientSection, PrepGroup, RecipeDraft,
    RecipeIngestionCandidate,
};
pub use normalize::convert_ingredient_measurement_to_metric;
pub use ocr::{parse_ocr_text, GoogleVisionRecognizer, TextRecognizer};
pub use prep_groups::build_prep_groups;
pub use shopping::{aggregate, ShoppingCategory, ShoppingEntry, ShoppingItem};
pub use store::{
    compute_metadata_patch, save_recipe, MetadataPatch, NormalizedRecipe, RecipeMetadata,
    RecipeStore,
};

/// Ingest a recipe page with the configuration from `recipe-ingest.toml` and
/// the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), recipe_ingest::ImportError> {
/// let recipe = recipe_ingest::import_url("https://example.com/recipe").await?;
/// println!("{} ingredients", recipe.ingredients.len());
/// # Ok(())
/// # }
/// ```
pub async fn import_url(url: &str) -> Result<NormalizedRecipe, ImportError> {
    RecipeImporter::builder().url(url).build().await
}

/// Parse a pasted recipe.
pub fn import_text(text: &str) -> Result<NormalizedRecipe, ImportError> {
    pipelines::text::process(text)
}
