use crate::error::ImportError;
use crate::ingest::{IngestionReport, Orchestrator};
use crate::store::NormalizedRecipe;
use log::info;

/// A URL import together with the run that produced it.
#[derive(Debug, Clone)]
pub struct UrlImport {
    pub recipe: NormalizedRecipe,
    pub report: IngestionReport,
}

/// Ingest `url` through every configured stage and normalize the winner.
///
/// # Errors
/// `ImportError::Ingestion` with the classified failure reason when no
/// stage produced an acceptable candidate.
pub async fn process(orchestrator: &Orchestrator, url: &str) -> Result<UrlImport, ImportError> {
    let report = orchestrator.ingest(url).await;
    let candidate = match &report.outcome {
        Ok(winner) => winner.candidate.clone(),
        Err(code) => return Err(ImportError::Ingestion { code: *code }),
    };
    info!(
        "Imported {} via {} ({} ingredients, {} steps)",
        url,
        candidate.stage,
        candidate.ingredients().len(),
        candidate.instructions().len()
    );
    Ok(UrlImport {
        recipe: NormalizedRecipe::from_candidate(url, &candidate),
        report,
    })
}
