use super::diagnostics::{IngestionDiagnostics, StageStatus};
use super::fetch_cache::FetchCache;
use super::scoring::{failure_reason, rank, select_best, ScoredCandidate};
use super::stages::{
    apply_page_metadata, HttpHtmlStage, MarkdownStage, ReadabilityStage, RenderedHtmlStage,
    StageContext, StageHandler,
};
use crate::config::{IngestConfig, ScoringConfig};
use crate::error::{ImportError, IngestionErrorCode};
use crate::model::{IngestionAttemptResult, IngestionStage, RecipeIngestionCandidate};
use crate::url_to_text::fetchers::{MarkdownFetcher, RenderFetcher, RequestFetcher};
use crate::url_to_text::html::extractors::{extract_structured, ParsingContext};
use log::{debug, info, warn};
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;

/// Everything one ingestion run produced.
#[derive(Debug, Clone)]
pub struct IngestionReport {
    /// The accepted candidate, or the classified reason there is none.
    pub outcome: Result<ScoredCandidate, IngestionErrorCode>,
    /// Every stage that was actually attempted, in order.
    pub attempts: Vec<IngestionAttemptResult>,
    pub diagnostics: IngestionDiagnostics,
}

impl IngestionReport {
    pub fn score(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|c| c.score)
    }

    pub fn into_result(self) -> Result<RecipeIngestionCandidate, ImportError> {
        self.outcome
            .map(|winner| winner.candidate)
            .map_err(ImportError::from)
    }
}

/// Runs the extraction stages in priority order and picks the best result.
pub struct Orchestrator {
    handlers: Vec<Box<dyn StageHandler>>,
    fetcher: Arc<RequestFetcher>,
    scoring: ScoringConfig,
}

impl Orchestrator {
    /// Handlers are run highest priority first regardless of the order given.
    /// `fetcher` serves the direct page for metadata hydration.
    pub fn new(
        mut handlers: Vec<Box<dyn StageHandler>>,
        fetcher: Arc<RequestFetcher>,
        scoring: ScoringConfig,
    ) -> Self {
        handlers.sort_by_key(|h| Reverse(h.stage().priority()));
        Self {
            handlers,
            fetcher,
            scoring,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self, ImportError> {
        let fetcher = Arc::new(RequestFetcher::from_config(config)?);
        let handlers: Vec<Box<dyn StageHandler>> = vec![
            Box::new(MarkdownStage::new(MarkdownFetcher::from_config(
                &config.markdown,
            )?)),
            Box::new(HttpHtmlStage::new(Arc::clone(&fetcher))),
            Box::new(RenderedHtmlStage::new(RenderFetcher::from_config(
                &config.render,
            )?)),
            Box::new(ReadabilityStage::new(Arc::clone(&fetcher))),
        ];
        Ok(Self::new(handlers, fetcher, config.scoring.clone()))
    }

    pub async fn ingest(&self, url: &str) -> IngestionReport {
        let cache = FetchCache::new();
        let context = StageContext { url, cache: &cache };
        let mut diagnostics = IngestionDiagnostics::new(url);
        let mut attempts: Vec<IngestionAttemptResult> = Vec::new();
        let mut candidates: Vec<ScoredCandidate> = Vec::new();
        let mut stopped_after: Option<usize> = None;

        for (index, handler) in self.handlers.iter().enumerate() {
            let stage = handler.stage();
            let started = Instant::now();
            let outcome = handler.run(&context).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            let result = match outcome {
                Ok(result) => result,
                Err(IngestionErrorCode::Disabled) => {
                    debug!("Stage {stage} is disabled, skipping");
                    diagnostics.record(stage, StageStatus::Skipped, None, latency_ms, None);
                    continue;
                }
                Err(code) => {
                    warn!("Stage {stage} failed for {url}: {code}");
                    attempts.push(IngestionAttemptResult::failed(stage, code, latency_ms));
                    diagnostics.record(stage, StageStatus::Failed, Some(code), latency_ms, None);
                    continue;
                }
            };

            let candidate = RecipeIngestionCandidate::new(stage, result.draft, latency_ms)
                .with_error(result.error)
                .with_raw_html(result.raw_html);
            if !candidate.success {
                let code = IngestionErrorCode::NoRecipeData;
                warn!("Stage {stage} returned an empty recipe for {url}");
                attempts.push(IngestionAttemptResult::failed(stage, code, latency_ms));
                diagnostics.record(stage, StageStatus::Failed, Some(code), latency_ms, None);
                continue;
            }
            attempts.push(candidate.attempt());

            let scored = ScoredCandidate::new(candidate);
            info!(
                "Stage {stage} produced a candidate for {url} (score {:.1})",
                scored.score
            );
            diagnostics.record(
                stage,
                StageStatus::Succeeded,
                scored.candidate.error,
                latency_ms,
                Some(scored.score),
            );
            let confident = scored.score >= self.scoring.high_confidence_score;
            candidates.push(scored);
            if confident {
                stopped_after = Some(index);
                break;
            }
        }

        if let Some(index) = stopped_after {
            for handler in &self.handlers[index + 1..] {
                diagnostics.record(handler.stage(), StageStatus::NotRun, None, 0, None);
            }
        }

        let best = select_best(&candidates);
        let outcome = match best {
            Some(index) if candidates[index].score >= self.scoring.min_acceptable_score => {
                let mut winner = candidates.swap_remove(index);
                merge_metadata(&mut winner, &mut candidates);

                let html_stage_ran = cache.direct_attempted()
                    || attempts.iter().any(|a| a.stage() == IngestionStage::HttpHtml);
                if stopped_after.is_some()
                    && !html_stage_ran
                    && needs_hydration(&winner.candidate)
                {
                    diagnostics.hydrated = self.hydrate(&context, &mut winner.candidate).await;
                }
                Ok(winner)
            }
            best => Err(failure_reason(
                best.map(|index| &candidates[index].candidate),
                &attempts,
            )),
        };

        match &outcome {
            Ok(winner) => {
                diagnostics.stage_used = Some(winner.candidate.stage);
                diagnostics.final_score = Some(winner.score);
                info!(
                    "Selected {} for {url} (score {:.1})",
                    winner.candidate.stage, winner.score
                );
            }
            Err(code) => {
                diagnostics.failure_reason = Some(*code);
                warn!("Ingestion failed for {url}: {code}");
            }
        }
        diagnostics.emit();

        IngestionReport {
            outcome,
            attempts,
            diagnostics,
        }
    }

    /// One direct fetch to recover image, video and tags for a winner that
    /// came from a stage other than the direct HTML one.
    async fn hydrate(
        &self,
        context: &StageContext<'_>,
        candidate: &mut RecipeIngestionCandidate,
    ) -> bool {
        let page = match context.cache.direct(&self.fetcher, context.url).await {
            Ok(page) => page,
            Err(code) => {
                warn!("Metadata hydration fetch failed for {}: {code}", context.url);
                return false;
            }
        };
        let parsing = ParsingContext::new(&page.final_url, &page.html);
        let before = candidate.draft.clone();
        if let Some(structured) = extract_structured(&parsing) {
            candidate.draft.backfill_metadata(&structured);
        }
        apply_page_metadata(&mut candidate.draft, &parsing);

        let changed = candidate.draft != before;
        if changed {
            info!("Hydrated metadata for {} from the direct page", context.url);
        }
        changed
    }
}

fn needs_hydration(candidate: &RecipeIngestionCandidate) -> bool {
    let draft = &candidate.draft;
    draft.image_url.is_none() || draft.video_url.is_none() || draft.tags.is_empty()
}

/// Fill the winner's empty metadata from the other candidates, best first.
fn merge_metadata(winner: &mut ScoredCandidate, others: &mut [ScoredCandidate]) {
    others.sort_by(rank);
    for other in others.iter().filter(|c| c.candidate.success) {
        winner.candidate.draft.backfill_metadata(&other.candidate.draft);
    }
}
