use crate::error::IngestionErrorCode;
use crate::model::IngestionStage;
use log::{info, warn};
use serde::Serialize;

pub const DIAGNOSTICS_TARGET: &str = "recipe_ingest::diagnostics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Succeeded,
    Failed,
    /// Not configured or switched off.
    Skipped,
    /// Never reached because an earlier stage was good enough.
    NotRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDiagnostic {
    pub stage: IngestionStage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<IngestionErrorCode>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// One structured record per ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionDiagnostics {
    pub source_host: Option<String>,
    pub stage_used: Option<IngestionStage>,
    pub stages: Vec<StageDiagnostic>,
    pub final_score: Option<f64>,
    pub failure_reason: Option<IngestionErrorCode>,
    /// Whether a supplementary direct fetch recovered metadata.
    pub hydrated: bool,
}

impl IngestionDiagnostics {
    pub fn new(url: &str) -> Self {
        Self {
            source_host: source_host(url),
            stage_used: None,
            stages: Vec::new(),
            final_score: None,
            failure_reason: None,
            hydrated: false,
        }
    }

    pub fn record(
        &mut self,
        stage: IngestionStage,
        status: StageStatus,
        error: Option<IngestionErrorCode>,
        latency_ms: u64,
        score: Option<f64>,
    ) {
        self.stages.push(StageDiagnostic {
            stage,
            status,
            error,
            latency_ms,
            score,
        });
    }

    pub fn stage(&self, stage: IngestionStage) -> Option<&StageDiagnostic> {
        self.stages.iter().find(|d| d.stage == stage)
    }

    /// Log the record as one JSON line.
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => info!(target: DIAGNOSTICS_TARGET, "{json}"),
            Err(e) => warn!(target: DIAGNOSTICS_TARGET, "Failed to serialize diagnostics: {e}"),
        }
    }
}

fn source_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_snake_case() {
        let mut diagnostics = IngestionDiagnostics::new("https://www.example.com/soup?x=1");
        assert_eq!(diagnostics.source_host.as_deref(), Some("example.com"));
        diagnostics.record(
            IngestionStage::Markdown,
            StageStatus::Skipped,
            None,
            0,
            None,
        );
        diagnostics.record(
            IngestionStage::HttpHtml,
            StageStatus::Failed,
            Some(IngestionErrorCode::Blocked),
            12,
            None,
        );
        diagnostics.failure_reason = Some(IngestionErrorCode::Blocked);

        let json: serde_json::Value = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json["stages"][0]["status"], "skipped");
        assert_eq!(json["stages"][1]["stage"], "http_html");
        assert_eq!(json["stages"][1]["error"], "blocked");
        assert_eq!(json["failure_reason"], "blocked");
        assert!(json["stages"][0].get("error").is_none());
    }

    #[test]
    fn test_unparseable_url_has_no_host() {
        assert!(IngestionDiagnostics::new("not a url").source_host.is_none());
    }
}
