//! Multi-stage URL ingestion: stage handlers, scoring, selection and
//! per-run diagnostics.

pub mod diagnostics;
pub mod fetch_cache;
pub mod orchestrator;
pub mod scoring;
pub mod stages;

pub use diagnostics::{IngestionDiagnostics, StageDiagnostic, StageStatus, DIAGNOSTICS_TARGET};
pub use fetch_cache::FetchCache;
pub use orchestrator::{IngestionReport, Orchestrator};
pub use scoring::{failure_reason, score_candidate, select_best, ScoredCandidate};
pub use stages::{
    HttpHtmlStage, MarkdownStage, ReadabilityStage, RenderedHtmlStage, StageContext,
    StageDraft, StageHandler, StageOutcome,
};
